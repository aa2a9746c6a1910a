//! Shared foundation for the DealScout conversational shopping assistant.
//!
//! Provides the top-level error type and the TOML configuration consumed
//! by the dialogue and language-model crates.

pub mod config;
pub mod error;

pub use config::{ChatConfig, DealscoutConfig, GeneralConfig, LlmConfig};
pub use error::{DealscoutError, Result};
