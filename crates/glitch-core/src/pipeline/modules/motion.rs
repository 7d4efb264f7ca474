use rand::RngCore;
use tracing::debug;

use super::check_kernel_size;
use crate::effects::{EffectKind, EffectSpec, MotionDirection, MotionDistortion, ZoomMotion};
use crate::error::{Error, Result};
use crate::image_buf::ImageBuf;
use crate::kernel::{self, Kernel};
use crate::pipeline::module::ProcessingModule;

pub struct MotionDistortionFilter;

impl ProcessingModule for MotionDistortionFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::MotionDistortion
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        motion_distortion(input, &spec.motion_distortion.params)
    }
}

pub struct ZoomMotionFilter;

impl ProcessingModule for ZoomMotionFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::ZoomMotion
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        zoom_motion(input, &spec.zoom_motion.params)
    }
}

fn require_intensity(param: &str, intensity: u32) -> Result<()> {
    if intensity == 0 {
        return Err(Error::invalid(format!("{param} must be at least 1")));
    }
    check_kernel_size(param, intensity)
}

/// Streak kernel for motion distortion: a `1 x i` row, an `i x 1` column or
/// the `i x i` main diagonal, every tap weighted `1 / i`.
pub fn distortion_kernel(direction: MotionDirection, intensity: u32) -> Result<Kernel> {
    require_intensity("motion_distortion.intensity", intensity)?;
    let i = intensity as usize;
    let w = 1.0 / i as f32;
    let kernel = match direction {
        MotionDirection::Horizontal => Kernel::uniform(i, 1, w),
        MotionDirection::Vertical => Kernel::uniform(1, i, w),
        MotionDirection::Diagonal => {
            let mut k = Kernel::zeros(i, i);
            for d in 0..i {
                k.set(d, d, w);
            }
            k
        }
    };
    Ok(kernel)
}

pub fn motion_distortion(input: &ImageBuf, params: &MotionDistortion) -> Result<ImageBuf> {
    let k = distortion_kernel(params.direction, params.intensity)?;
    Ok(kernel::convolve(input, &k))
}

/// `a * (1 - alpha) + b * alpha`, sample by sample.
fn blend(a: &ImageBuf, b: &ImageBuf, alpha: f32) -> ImageBuf {
    let mut out = a.clone();
    for (o, &v) in out.data.iter_mut().zip(&b.data) {
        *o = *o * (1.0 - alpha) + v * alpha;
    }
    out
}

/// Radial zoom trail.
///
/// Step `s` of `i` enlarges the untouched input by `1 + s / (10 i)`, crops
/// the center back to the input size and blends it into the running result
/// with weight `1 / (s + 1)`. Every step resamples the input, never the
/// accumulated result.
pub fn zoom_motion(input: &ImageBuf, params: &ZoomMotion) -> Result<ImageBuf> {
    require_intensity("zoom_motion.intensity", params.intensity)?;
    let (w, h) = (input.width, input.height);
    if w == 0 || h == 0 {
        return Ok(input.clone());
    }

    let steps = params.intensity;
    let mut acc = input.clone();
    for step in 1..=steps {
        let scale = 1.0 + f64::from(step) / (f64::from(steps) * 10.0);
        let new_w = ((f64::from(w) * scale) as u32).max(w);
        let new_h = ((f64::from(h) * scale) as u32).max(h);

        let zoomed = kernel::resize_bilinear(input, new_w, new_h)?;
        let cropped = kernel::crop(&zoomed, (new_w - w) / 2, (new_h - h) / 2, w, h)?;

        let alpha = 1.0 / (step as f32 + 1.0);
        acc = blend(&acc, &cropped, alpha);
    }
    debug!(steps, "zoom trail blended");
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(size: u32) -> ImageBuf {
        let mut img = ImageBuf::new(size, size, 1).unwrap();
        let idx = img.index(size / 2, size / 2, 0);
        img.data[idx] = 255.0;
        img
    }

    fn gradient(w: u32, h: u32) -> ImageBuf {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let mixed = ((x * y) % 255) as f32;
                data.extend_from_slice(&[x as f32 * 5.0, y as f32 * 2.0, mixed]);
            }
        }
        ImageBuf::from_data(w, h, 3, data).unwrap()
    }

    #[test]
    fn distortion_kernel_shapes() {
        let h = distortion_kernel(MotionDirection::Horizontal, 4).unwrap();
        assert_eq!((h.width, h.height), (4, 1));
        let v = distortion_kernel(MotionDirection::Vertical, 4).unwrap();
        assert_eq!((v.width, v.height), (1, 4));
        let d = distortion_kernel(MotionDirection::Diagonal, 4).unwrap();
        assert_eq!((d.width, d.height), (4, 4));
        assert_eq!(d.nonzero_count(), 4);
        for k in [h, v, d] {
            assert!((k.sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn horizontal_distortion_streaks_impulse() {
        let out = motion_distortion(
            &impulse(11),
            &MotionDistortion {
                direction: MotionDirection::Horizontal,
                intensity: 4,
            },
        )
        .unwrap();
        for x in 4..=7 {
            assert!((out.get(x, 5, 0) - 63.75).abs() < 1e-4);
        }
        assert_eq!(out.get(3, 5, 0), 0.0);
        assert_eq!(out.get(8, 5, 0), 0.0);
        assert_eq!(out.get(5, 4, 0), 0.0);
    }

    #[test]
    fn diagonal_distortion_follows_diagonal() {
        let out = motion_distortion(
            &impulse(11),
            &MotionDistortion {
                direction: MotionDirection::Diagonal,
                intensity: 3,
            },
        )
        .unwrap();
        for d in 4..=6 {
            assert!((out.get(d, d, 0) - 85.0).abs() < 1e-4);
        }
        assert_eq!(out.get(6, 4, 0), 0.0);
    }

    #[test]
    fn zero_intensity_is_rejected() {
        let img = impulse(5);
        assert!(matches!(
            motion_distortion(
                &img,
                &MotionDistortion {
                    direction: MotionDirection::Vertical,
                    intensity: 0,
                },
            ),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            zoom_motion(&img, &ZoomMotion { intensity: 0 }),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn zoom_keeps_constant_field() {
        let img = ImageBuf::filled(40, 30, 4, 180.0).unwrap();
        let out = zoom_motion(&img, &ZoomMotion { intensity: 5 }).unwrap();
        assert_eq!(out.dims(), img.dims());
        assert!(out.data.iter().all(|&v| (v - 180.0).abs() < 1e-3));
    }

    #[test]
    fn single_step_zoom_changes_asymmetric_image() {
        let img = gradient(50, 50);
        let out = zoom_motion(&img, &ZoomMotion { intensity: 1 }).unwrap();
        assert_eq!(out.dims(), img.dims());
        assert_ne!(out, img);
    }

    #[test]
    fn zoom_resamples_original_every_step() {
        let img = gradient(50, 50);
        let out = zoom_motion(&img, &ZoomMotion { intensity: 2 }).unwrap();

        // scale 1.05 -> 52px, scale 1.1 -> 55px
        let step = |src: &ImageBuf, size: u32| {
            let z = kernel::resize_bilinear(src, size, size).unwrap();
            kernel::crop(&z, (size - 50) / 2, (size - 50) / 2, 50, 50).unwrap()
        };

        let first = blend(&img, &step(&img, 52), 0.5);
        let from_original = blend(&first, &step(&img, 55), 1.0 / 3.0);
        assert_eq!(out, from_original);

        let from_accumulator = blend(&first, &step(&first, 55), 1.0 / 3.0);
        assert_ne!(out, from_accumulator);
    }

    #[test]
    fn zoom_on_tiny_image_is_stable() {
        let img = ImageBuf::filled(1, 1, 1, 42.0).unwrap();
        let out = zoom_motion(&img, &ZoomMotion { intensity: 3 }).unwrap();
        assert_eq!(out.dims(), (1, 1, 1));
        assert!((out.data[0] - 42.0).abs() < 1e-4);
    }
}
