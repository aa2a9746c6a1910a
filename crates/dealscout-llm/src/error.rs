//! Error types for the language-model backend.

use thiserror::Error;

/// Errors from a text-generation attempt.
///
/// Every variant is recoverable: the dialogue engine treats any error as
/// "no generated text this turn" and falls back to a template.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no language-model backend configured")]
    Unavailable,

    #[error("backend request timed out")]
    Timeout,

    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("backend misconfigured: {0}")]
    Configuration(String),
}
