//! Error types for the dialogue engine.

/// Errors from the dialogue engine.
///
/// Backend (language-model) failures never appear here: they are
/// recovered inside the engine by switching to a template reply.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("dialogue engine is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("storage error: {0}")]
    StorageError(String),
}
