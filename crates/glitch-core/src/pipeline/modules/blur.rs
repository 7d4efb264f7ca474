use rand::RngCore;

use super::check_kernel_size;
use crate::effects::{BoxBlur, EffectKind, EffectSpec, GaussianBlur, MotionBlur};
use crate::error::{Error, Result};
use crate::image_buf::ImageBuf;
use crate::kernel::{self, oddify};
use crate::pipeline::module::ProcessingModule;

pub struct GaussianBlurFilter;

impl ProcessingModule for GaussianBlurFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::GaussianBlur
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        gaussian_blur(input, &spec.gaussian_blur.params)
    }
}

pub struct MotionBlurFilter;

impl ProcessingModule for MotionBlurFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::MotionBlur
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        motion_blur(input, &spec.motion_blur.params)
    }
}

pub struct BoxBlurFilter;

impl ProcessingModule for BoxBlurFilter {
    fn kind(&self) -> EffectKind {
        EffectKind::BoxBlur
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        box_blur(input, &spec.box_blur.params)
    }
}

/// Separable Gaussian with side `oddify(kernel_size)` and auto-derived sigma.
pub fn gaussian_blur(input: &ImageBuf, params: &GaussianBlur) -> Result<ImageBuf> {
    check_kernel_size("gaussian_blur.kernel_size", params.kernel_size)?;
    let k = kernel::gaussian_kernel_1d(params.kernel_size);
    Ok(kernel::convolve_separable(input, &k))
}

/// Streak along `angle` degrees using the motion line kernel.
pub fn motion_blur(input: &ImageBuf, params: &MotionBlur) -> Result<ImageBuf> {
    check_kernel_size("motion_blur.degree", params.degree)?;
    if !params.angle.is_finite() {
        return Err(Error::invalid(format!(
            "motion_blur.angle must be finite, got {}",
            params.angle
        )));
    }
    let k = kernel::motion_line_kernel(params.degree, params.angle);
    Ok(kernel::convolve(input, &k))
}

/// Uniform average over an `oddify(kernel_size)` square.
///
/// The box kernel factors into two 1D passes of weight `1 / side`, which
/// gives the same `1 / side^2` weights as the 2D box kernel.
pub fn box_blur(input: &ImageBuf, params: &BoxBlur) -> Result<ImageBuf> {
    check_kernel_size("box_blur.kernel_size", params.kernel_size)?;
    let side = oddify(params.kernel_size) as usize;
    let k = vec![1.0 / side as f32; side];
    Ok(kernel::convolve_separable(input, &k))
}
