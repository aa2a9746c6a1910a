//! HTTP chat-completions client.
//!
//! Speaks the OpenAI-compatible chat-completions contract: a single JSON
//! POST with role-tagged messages, bearer authentication, and a request
//! timeout. No retries -- a failed call degrades one dialogue turn to a
//! template reply, so retrying here would only add latency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use dealscout_core::config::LlmConfig;

use crate::error::LlmError;
use crate::generator::{NullGenerator, TextGenerator};
use crate::message::ChatMessage;

/// Network-backed [`TextGenerator`] for an OpenAI-compatible endpoint.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Build a client from configuration, reading the API key from the
    /// environment variable named in `config.api_key_env`.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::Configuration(format!("env var {} is not set", config.api_key_env))
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = build_request_body(&self.model, self.max_tokens, self.temperature, messages);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        let payload = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let text = parse_completion(&payload)?;
        debug!(model = %self.model, chars = text.len(), "generation succeeded");
        Ok(text)
    }
}

/// Assemble the chat-completions request payload.
fn build_request_body(
    model: &str,
    max_tokens: u32,
    temperature: f64,
    messages: &[ChatMessage],
) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": temperature,
    })
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

/// Extract the first choice's text from a raw completion payload.
fn parse_completion(payload: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse =
        serde_json::from_str(payload).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| LlmError::MalformedResponse("response has no choices".to_string()))?;

    if text.trim().is_empty() {
        return Err(LlmError::MalformedResponse(
            "completion text is empty".to_string(),
        ));
    }

    Ok(text)
}

/// Select a generator for the given configuration.
///
/// Returns the network client when the backend is enabled and its API key
/// is present, otherwise the [`NullGenerator`]. The dialogue engine holds
/// the result as `Arc<dyn TextGenerator>` and never inspects which one it
/// got.
pub fn generator_from_config(config: &LlmConfig) -> Arc<dyn TextGenerator> {
    if !config.enabled {
        info!("language-model backend disabled by config");
        return Arc::new(NullGenerator);
    }

    match ChatCompletionsClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            info!("language-model backend not configured: {}", e);
            Arc::new(NullGenerator)
        }
    }
}
