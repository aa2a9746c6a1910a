//! Conversational shopping front end.
//!
//! Turns free-form Hebrew chat into structured product searches. Each
//! user message runs through a small state machine: idle messages are
//! classified as a specific item, a generic category, or plain chat;
//! follow-up messages fill brand, budget, priority, and location slots
//! until a search query can be assembled. Replies come from an optional
//! language-model backend with deterministic Hebrew templates as the
//! fallback, so the dialogue works identically without a backend.

pub mod controller;
pub mod error;
pub mod extractor;
pub mod lexicon;
pub mod response;
pub mod session;
pub mod types;

pub use controller::DialogueEngine;
pub use error::DialogueError;
pub use session::{Session, SessionStore};
pub use types::{DialogueState, ExtractedSlots, Intent, TurnReply};
