use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DealscoutError, Result};

/// Top-level configuration for the DealScout application.
///
/// Loaded from `~/.dealscout/config.toml` by default. Each section
/// corresponds to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealscoutConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for DealscoutConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            chat: ChatConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl DealscoutConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DealscoutConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DealscoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Dialogue engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the dialogue engine accepts messages.
    pub enabled: bool,
    /// Maximum incoming message length in characters.
    pub max_message_length: usize,
    /// Maximum number of prior messages kept as language-model context.
    pub max_history: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_message_length: 2000,
            max_history: 10,
        }
    }
}

/// Language-model backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether the language-model backend is used at all. When false the
    /// dialogue engine runs entirely on deterministic templates.
    pub enabled: bool,
    /// Chat-completions endpoint URL.
    pub api_url: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never stored in the config file.
    pub api_key_env: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "anthropic/claude-3.5-sonnet".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            timeout_ms: 15_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DealscoutConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.chat.enabled);
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.chat.max_history, 10);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.max_tokens, 256);
        assert_eq!(config.llm.timeout_ms, 15_000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[chat]
enabled = false
max_message_length = 500
max_history = 4

[llm]
enabled = false
api_url = "http://localhost:8080/v1/chat/completions"
api_key_env = "LOCAL_LLM_KEY"
model = "local-test-model"
max_tokens = 128
temperature = 0.2
timeout_ms = 3000
"#;
        let file = create_temp_config(content);
        let config = DealscoutConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert!(!config.chat.enabled);
        assert_eq!(config.chat.max_message_length, 500);
        assert_eq!(config.chat.max_history, 4);
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.api_key_env, "LOCAL_LLM_KEY");
        assert_eq!(config.llm.model, "local-test-model");
        assert!((config.llm.temperature - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = DealscoutConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        // Remaining fields use defaults
        assert_eq!(config.chat.max_history, 10);
        assert_eq!(config.llm.max_tokens, 256);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DealscoutConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert!(config.chat.enabled);
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        let result = DealscoutConfig::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = DealscoutConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.max_message_length, 2000);
        assert!(config.llm.enabled);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = DealscoutConfig::default();
        config.save(&path).unwrap();

        let reloaded = DealscoutConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.log_level, config.general.log_level);
        assert_eq!(reloaded.chat.max_history, config.chat.max_history);
        assert_eq!(reloaded.llm.model, config.llm.model);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("config.toml");

        let config = DealscoutConfig::default();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = DealscoutConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.log_level, "info");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = DealscoutConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: DealscoutConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.general.log_level, config.general.log_level);
        assert_eq!(
            deserialized.chat.max_message_length,
            config.chat.max_message_length
        );
        assert_eq!(deserialized.llm.api_key_env, config.llm.api_key_env);
        assert_eq!(deserialized.llm.max_tokens, config.llm.max_tokens);
    }

    #[test]
    fn test_sub_config_defaults() {
        let general = GeneralConfig::default();
        assert_eq!(general.log_level, "info");

        let chat = ChatConfig::default();
        assert!(chat.enabled);
        assert_eq!(chat.max_message_length, 2000);
        assert_eq!(chat.max_history, 10);

        let llm = LlmConfig::default();
        assert!(llm.enabled);
        assert_eq!(llm.api_key_env, "OPENROUTER_API_KEY");
        assert!((llm.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_api_key_never_serialized() {
        // The config carries only the env var NAME for the key.
        let config = DealscoutConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("api_key_env"));
        assert!(!toml_str.contains("sk-"));
    }
}
