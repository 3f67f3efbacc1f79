//! Error types for reveal configuration and platform facilities.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RevealError {
    /// Threshold outside `[0, 1]` or not a finite number.
    #[error("invalid threshold {0}: expected a finite value in [0, 1]")]
    InvalidThreshold(f64),

    /// Reveal delay hint was negative or not finite.
    #[error("invalid reveal delay {0}: expected a finite, non-negative value")]
    InvalidDelay(f64),

    /// Configuration JSON could not be parsed.
    #[error("reveal config error: {0}")]
    InvalidConfig(String),

    /// The host could not provide intersection detection or deferred execution.
    #[error("platform facility unavailable: {0}")]
    Platform(String),
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        RevealError::InvalidConfig(err.to_string())
    }
}
