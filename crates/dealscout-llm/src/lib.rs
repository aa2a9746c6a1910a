//! Language-model backend for DealScout.
//!
//! Exposes the [`TextGenerator`] capability trait consumed by the dialogue
//! engine, a chat-completions HTTP client, and a null implementation used
//! when no backend is configured. Callers never branch on "is a backend
//! configured" -- only on whether a call returned text.

pub mod client;
pub mod error;
pub mod generator;
pub mod message;

pub use client::{generator_from_config, ChatCompletionsClient};
pub use error::LlmError;
pub use generator::{NullGenerator, TextGenerator};
pub use message::{ChatMessage, Role};
