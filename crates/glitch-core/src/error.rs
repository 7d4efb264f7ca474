pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by filters and the effects pipeline.
///
/// A failed pipeline call never yields a partially processed image.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("processing failure: {0}")]
    ProcessingFailure(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::ProcessingFailure(msg.into())
    }
}
