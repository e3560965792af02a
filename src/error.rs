use crate::applier::ApplyError;

/// Convenience result type used across framesweep.
pub type FramesweepResult<T> = Result<T, FramesweepError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FramesweepError {
    /// The JSON automation spec is structurally or semantically invalid.
    /// Construction-time and fatal: no engine is created.
    #[error("malformed spec: {0}")]
    MalformedSpec(String),

    /// Out-of-range or non-finite option values. Construction-time and fatal.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The embedder's settings applier rejected a case. Per-case and
    /// non-fatal: the sweep advances unless configured to halt.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramesweepError {
    /// Build a [`FramesweepError::MalformedSpec`] value.
    pub fn malformed_spec(msg: impl Into<String>) -> Self {
        Self::MalformedSpec(msg.into())
    }

    /// Build a [`FramesweepError::InvalidOptions`] value.
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }

    /// Build a [`FramesweepError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
