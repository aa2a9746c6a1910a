use thiserror::Error;

/// Top-level error type for the DealScout foundation.
///
/// Covers the fallible operations this crate owns (configuration I/O and
/// serialization). Subsystem crates define their own error types; nothing
/// here leaks into a dialogue turn.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DealscoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for DealscoutError {
    fn from(err: toml::de::Error) -> Self {
        DealscoutError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DealscoutError {
    fn from(err: toml::ser::Error) -> Self {
        DealscoutError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DealscoutError {
    fn from(err: serde_json::Error) -> Self {
        DealscoutError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for DealScout operations.
pub type Result<T> = std::result::Result<T, DealscoutError>;
