/// Result alias used across the crate.
pub type ScrollreelResult<T> = Result<T, ScrollreelError>;

/// Error taxonomy for scene construction, timeline binding and rendering.
#[derive(thiserror::Error, Debug)]
pub enum ScrollreelError {
    /// Invalid configuration or authored data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid tween or timeline data.
    #[error("animation error: {0}")]
    Animation(String),

    /// Failure while evaluating or rasterizing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollreelError {
    /// Build a [`ScrollreelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollreelError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ScrollreelError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ScrollreelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollreelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
