pub mod cache;
pub mod scaler;
pub mod session;

pub use cache::PreviewCache;
pub use scaler::{
    PreviewMode, preview_dimensions, scale_for_preview, scale_for_preview_named, to_dynamic,
};
pub use session::{PreviewOutcome, PreviewSession};
