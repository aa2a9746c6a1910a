//! The text-generation capability trait and its null implementation.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::message::ChatMessage;

/// Capability interface for the optional language-model backend.
///
/// Given an ordered list of role-tagged messages (policy preamble,
/// optional slot context, bounded recent history), produce generated text
/// or fail. Implementations must be safe to call concurrently for
/// different users.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// Backend-absent implementation: every call fails with
/// [`LlmError::Unavailable`], which the dialogue engine converts into a
/// deterministic template reply.
pub struct NullGenerator;

#[async_trait]
impl TextGenerator for NullGenerator {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
        Err(LlmError::Unavailable)
    }
}
