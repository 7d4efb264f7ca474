pub mod effects;
pub mod error;
pub mod fingerprint;
pub mod image_buf;
pub mod kernel;
pub mod limits;
pub mod pipeline;

pub use effects::{Category, Effect, EffectKind, EffectSpec, Toggle};
pub use error::{Error, Result};
pub use fingerprint::{Fingerprint, fingerprint, fingerprint_value};
pub use image_buf::{Image8, ImageBuf};
pub use limits::{LimitViolation, ParamLimits};
pub use pipeline::{Pipeline, apply_effects};
