use rand::{Rng, RngCore};
use tracing::debug;

use crate::effects::{CameraShake, DirectionalShake, EffectKind, EffectSpec, ShakeDirection};
use crate::error::Result;
use crate::image_buf::ImageBuf;
use crate::kernel;
use crate::pipeline::module::ProcessingModule;

pub struct CameraShakeFilter;

impl ProcessingModule for CameraShakeFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::CameraShake
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        camera_shake(input, &spec.camera_shake.params, rng)
    }
}

pub struct DirectionalShakeFilter;

impl ProcessingModule for DirectionalShakeFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::DirectionalShake
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        directional_shake(input, &spec.directional_shake.params, rng)
    }
}

fn offset(rng: &mut dyn RngCore, intensity: u32) -> i64 {
    let i = i64::from(intensity);
    rng.gen_range(-i..=i)
}

/// Translate by a random `(dx, dy)`, each uniform in `[-intensity, intensity]`.
///
/// Not a pure function: every call draws a fresh offset from `rng`.
pub fn camera_shake(
    input: &ImageBuf,
    params: &CameraShake,
    rng: &mut dyn RngCore,
) -> Result<ImageBuf> {
    let dx = offset(rng, params.intensity);
    let dy = offset(rng, params.intensity);
    debug!(dx, dy, "camera shake offset");
    Ok(kernel::translate(input, dx, dy))
}

/// Camera shake restricted to one axis, or both.
pub fn directional_shake(
    input: &ImageBuf,
    params: &DirectionalShake,
    rng: &mut dyn RngCore,
) -> Result<ImageBuf> {
    let (dx, dy) = match params.direction {
        ShakeDirection::Horizontal => (offset(rng, params.intensity), 0),
        ShakeDirection::Vertical => (0, offset(rng, params.intensity)),
        ShakeDirection::Both => {
            let dx = offset(rng, params.intensity);
            (dx, offset(rng, params.intensity))
        }
    };
    debug!(dx, dy, direction = ?params.direction, "directional shake offset");
    Ok(kernel::translate(input, dx, dy))
}
