use rand::RngCore;

use crate::effects::{EffectKind, EffectSpec};
use crate::error::Result;
use crate::image_buf::ImageBuf;

/// A single filter step in the effects pipeline.
///
/// Implementations treat `input` as immutable and return a new buffer with
/// the same dimensions and channel count. They never clamp.
pub trait ProcessingModule: Send + Sync {
    fn kind(&self) -> EffectKind;

    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn process_cpu(
        &self,
        input: &ImageBuf,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf>;
}
