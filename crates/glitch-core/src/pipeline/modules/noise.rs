use rand::{Rng, RngCore};

use crate::effects::{EffectKind, EffectSpec, GaussianNoise, SaltPepperNoise};
use crate::error::{Error, Result};
use crate::image_buf::ImageBuf;
use crate::pipeline::module::ProcessingModule;

pub struct GaussianNoiseFilter;

impl ProcessingModule for GaussianNoiseFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::GaussianNoise
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        gaussian_noise(input, &spec.gaussian_noise.params, rng)
    }
}

pub struct SaltPepperFilter;

impl ProcessingModule for SaltPepperFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::SaltPepperNoise
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        salt_pepper_noise(input, &spec.salt_pepper_noise.params, rng)
    }
}

/// Standard normal sample via the Box-Muller transform.
fn next_gaussian(rng: &mut dyn RngCore) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Add zero-mean normal noise with `sigma = sqrt(variance) * 255`,
/// drawn independently for every sample of every channel.
pub fn gaussian_noise(
    input: &ImageBuf,
    params: &GaussianNoise,
    rng: &mut dyn RngCore,
) -> Result<ImageBuf> {
    let variance = params.variance;
    if !variance.is_finite() || variance < 0.0 {
        return Err(Error::invalid(format!(
            "gaussian_noise.variance must be finite and >= 0, got {variance}"
        )));
    }

    let mut out = input.clone();
    if variance == 0.0 {
        return Ok(out);
    }

    let sigma = variance.sqrt() * 255.0;
    for v in &mut out.data {
        *v += (next_gaussian(rng) * sigma) as f32;
    }
    Ok(out)
}

/// Set `ceil(amount * pixels * 0.5)` random pixels to 255 on every channel,
/// then an independently drawn set of the same size to 0.
///
/// Coordinates are drawn with replacement and the two sets may overlap; a
/// pixel hit by both ends up black since pepper is applied last.
pub fn salt_pepper_noise(
    input: &ImageBuf,
    params: &SaltPepperNoise,
    rng: &mut dyn RngCore,
) -> Result<ImageBuf> {
    let amount = params.amount;
    if !amount.is_finite() || !(0.0..=1.0).contains(&amount) {
        return Err(Error::invalid(format!(
            "salt_pepper_noise.amount must be within [0, 1], got {amount}"
        )));
    }

    let mut out = input.clone();
    let pixels = input.pixel_count();
    if pixels == 0 {
        return Ok(out);
    }

    let count = (amount * pixels as f64 * 0.5).ceil() as usize;
    let ch = input.channels as usize;

    for value in [255.0f32, 0.0] {
        let coords: Vec<(u32, u32)> = (0..count)
            .map(|_| {
                (
                    rng.gen_range(0..input.width),
                    rng.gen_range(0..input.height),
                )
            })
            .collect();
        for (x, y) in coords {
            let idx = out.index(x, y, 0);
            out.data[idx..idx + ch].fill(value);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gray(w: u32, h: u32, channels: u8) -> ImageBuf {
        ImageBuf::filled(w, h, channels, 128.0).unwrap()
    }

    #[test]
    fn zero_variance_is_identity() {
        let img = gray(8, 8, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let out = gaussian_noise(&img, &GaussianNoise { variance: 0.0 }, &mut rng).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn noise_statistics_match_variance() {
        let img = gray(64, 64, 3);
        let mut rng = StdRng::seed_from_u64(7);
        let out = gaussian_noise(&img, &GaussianNoise { variance: 0.01 }, &mut rng).unwrap();

        let n = out.data.len() as f64;
        let mean = out.data.iter().map(|&v| v as f64 - 128.0).sum::<f64>() / n;
        let var = out
            .data
            .iter()
            .map(|&v| (v as f64 - 128.0 - mean).powi(2))
            .sum::<f64>()
            / n;
        // Expected sigma = 0.1 * 255 = 25.5
        assert!(mean.abs() < 1.5, "mean {mean}");
        assert!((var.sqrt() - 25.5).abs() < 1.5, "sigma {}", var.sqrt());
    }

    #[test]
    fn noise_is_not_clamped() {
        let img = ImageBuf::filled(32, 32, 1, 250.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let out = gaussian_noise(&img, &GaussianNoise { variance: 0.5 }, &mut rng).unwrap();
        assert!(out.data.iter().any(|&v| v > 255.0));
        assert!(out.data.iter().any(|&v| v < 0.0));
    }

    #[test]
    fn same_seed_same_noise() {
        let img = gray(6, 6, 4);
        let params = GaussianNoise { variance: 0.05 };
        let a = gaussian_noise(&img, &params, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = gaussian_noise(&img, &params, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_negative_variance() {
        let img = gray(2, 2, 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            gaussian_noise(&img, &GaussianNoise { variance: -0.1 }, &mut rng),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn salt_pepper_touches_only_extremes() {
        let img = gray(40, 40, 3);
        let mut rng = StdRng::seed_from_u64(11);
        let out = salt_pepper_noise(&img, &SaltPepperNoise { amount: 0.1 }, &mut rng).unwrap();

        let mut salt = 0;
        let mut pepper = 0;
        for px in out.data.chunks_exact(3) {
            match px {
                [a, b, c] if *a == 255.0 && *b == 255.0 && *c == 255.0 => salt += 1,
                [a, b, c] if *a == 0.0 && *b == 0.0 && *c == 0.0 => pepper += 1,
                [a, b, c] => assert!(*a == 128.0 && *b == 128.0 && *c == 128.0),
                _ => unreachable!(),
            }
        }
        // ceil(0.1 * 1600 * 0.5) = 80 draws each, with replacement.
        assert!(salt > 0 && salt <= 80, "salt {salt}");
        assert!(pepper > 0 && pepper <= 80, "pepper {pepper}");
        assert!(salt + pepper > 120);
    }

    #[test]
    fn salt_pepper_zero_amount_is_identity() {
        let img = gray(10, 10, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let out = salt_pepper_noise(&img, &SaltPepperNoise { amount: 0.0 }, &mut rng).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn salt_pepper_rejects_out_of_range_amount() {
        let img = gray(4, 4, 1);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(salt_pepper_noise(&img, &SaltPepperNoise { amount: 1.5 }, &mut rng).is_err());
        assert!(
            salt_pepper_noise(&img, &SaltPepperNoise { amount: f64::NAN }, &mut rng).is_err()
        );
    }

    #[test]
    fn salt_pepper_handles_single_pixel_rows() {
        let img = gray(1, 5, 1);
        let mut rng = StdRng::seed_from_u64(9);
        let out = salt_pepper_noise(&img, &SaltPepperNoise { amount: 1.0 }, &mut rng).unwrap();
        assert_eq!(out.dims(), img.dims());
    }

    #[test]
    fn filters_leave_input_untouched() {
        let img = gray(8, 8, 3);
        let before = img.clone();
        let mut rng = StdRng::seed_from_u64(2);
        let _ = gaussian_noise(&img, &GaussianNoise { variance: 0.2 }, &mut rng).unwrap();
        let _ = salt_pepper_noise(&img, &SaltPepperNoise { amount: 0.5 }, &mut rng).unwrap();
        assert_eq!(img, before);
    }
}
