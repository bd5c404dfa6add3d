pub type CaptixResult<T> = Result<T, CaptixError>;

/// Error taxonomy for the compositing core.
///
/// `Decode` and `Render` failures are recoverable by re-triggering a redraw
/// once inputs are valid; `Encode` is the one condition a caller must surface
/// to the end user, since it terminates an explicit export action.
#[derive(thiserror::Error, Debug)]
pub enum CaptixError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptixError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
