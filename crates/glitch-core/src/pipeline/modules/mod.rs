pub mod blur;
pub mod motion;
pub mod noise;
pub mod shake;

pub use blur::{BoxBlurFilter, GaussianBlurFilter, MotionBlurFilter};
pub use motion::{MotionDistortionFilter, ZoomMotionFilter};
pub use noise::{GaussianNoiseFilter, SaltPepperFilter};
pub use shake::{CameraShakeFilter, DirectionalShakeFilter};

use crate::error::{Error, Result};

/// Largest kernel side or streak length a filter will build. Well above the
/// extreme control range; guards against runaway allocations.
pub const MAX_KERNEL_SIZE: u32 = 1001;

fn check_kernel_size(param: &str, size: u32) -> Result<()> {
    if size > MAX_KERNEL_SIZE {
        return Err(Error::invalid(format!(
            "{param} = {size} exceeds {MAX_KERNEL_SIZE}"
        )));
    }
    Ok(())
}
