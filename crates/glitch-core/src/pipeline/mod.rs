pub mod module;
pub mod modules;

use std::time::Instant;

use rand::RngCore;
use tracing::debug;

use crate::effects::EffectSpec;
use crate::error::{Error, Result};
use crate::image_buf::{Image8, ImageBuf};
use module::ProcessingModule;

/// Processing pipeline that chains the effect filters together.
///
/// ```text
/// noise (gaussian, salt & pepper)
///   -> blur (gaussian, motion, box)
///   -> shake (camera, directional)
///   -> motion (distortion, zoom)
///   -> quantize
/// ```
///
/// Every module operates on a working-precision ImageBuf. Disabled effects
/// are skipped; the order does not depend on key order in the JSON.
pub struct Pipeline {
    modules: Vec<Box<dyn ProcessingModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            modules: vec![
                Box::new(modules::GaussianNoiseFilter),
                Box::new(modules::SaltPepperFilter),
                Box::new(modules::GaussianBlurFilter),
                Box::new(modules::MotionBlurFilter),
                Box::new(modules::BoxBlurFilter),
                Box::new(modules::CameraShakeFilter),
                Box::new(modules::DirectionalShakeFilter),
                Box::new(modules::MotionDistortionFilter),
                Box::new(modules::ZoomMotionFilter),
            ],
        }
    }

    /// Run every enabled module on `input`, staying in working precision.
    ///
    /// The first failing module aborts the run; no partial result escapes.
    pub fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let started = Instant::now();
        let mut current: Option<ImageBuf> = None;

        for module in &self.modules {
            if !spec.is_enabled(module.kind()) {
                continue;
            }
            let step = Instant::now();
            let src = current.as_ref().unwrap_or(input);
            let out = module.process_cpu(src, spec, rng)?;
            if out.dims() != input.dims() || out.data.len() != input.data.len() {
                return Err(Error::processing(format!(
                    "{} changed the image from {:?} to {:?}",
                    module.name(),
                    input.dims(),
                    out.dims()
                )));
            }
            debug!(
                module = module.name(),
                elapsed_ms = step.elapsed().as_secs_f64() * 1000.0,
                "processing"
            );
            current = Some(out);
        }

        debug!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "pipeline finished"
        );
        Ok(current.unwrap_or_else(|| input.clone()))
    }

    /// Full effects pass on a storage image: widen, process, quantize.
    pub fn apply(
        &self,
        image: &Image8,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<Image8> {
        self.apply_working(&image.to_working(), spec, rng)
    }

    /// Same as [`Pipeline::apply`] for a source already in working precision.
    pub fn apply_working(
        &self,
        image: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<Image8> {
        Ok(self.process_cpu(image, spec, rng)?.quantize())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot effects pass with a default pipeline.
pub fn apply_effects(
    image: &Image8,
    spec: &EffectSpec,
    rng: &mut dyn RngCore,
) -> Result<Image8> {
    Pipeline::new().apply(image, spec, rng)
}
