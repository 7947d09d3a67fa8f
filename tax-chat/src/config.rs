//! Chat proxy configuration.
//!
//! Settings come from a TOML file where every field is optional, so an empty
//! file (or no file at all) yields [`ChatConfig::default`]. API keys are never
//! read from the file, only from the environment:
//!
//! | provider  | variable          |
//! |-----------|-------------------|
//! | `mistral` | `MISTRAL_API_KEY` |
//! | `gemini`  | `GEMINI_API_KEY`  |

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    pub bind_address: String,
    /// The one browser origin allowed to call the proxy.
    pub allowed_origin: String,
    /// Registry name of the provider, e.g. `mistral` or `gemini`.
    pub provider: String,
    pub model: String,
    pub knowledge_base_path: PathBuf,
    /// Number of prior turns forwarded upstream with each message.
    pub max_history_turns: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Overrides the provider's API root. Only useful for testing.
    pub base_url: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            provider: "mistral".to_string(),
            model: "mistral-small".to_string(),
            knowledge_base_path: PathBuf::from("knowledge_base.txt"),
            max_history_turns: 6,
            temperature: 0.7,
            max_tokens: 150,
            base_url: None,
        }
    }
}

impl ChatConfig {
    /// Parses and validates TOML text. `origin` names the source in errors.
    pub fn from_toml(
        text: &str,
        origin: &str,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                field: "temperature",
                message: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "max_tokens",
                message: "must be at least 1".to_string(),
            });
        }
        if self.allowed_origin.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "allowed_origin",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Environment variable holding the API key for `provider`.
pub fn api_key_variable(provider: &str) -> Option<&'static str> {
    match provider {
        "mistral" => Some("MISTRAL_API_KEY"),
        "gemini" => Some("GEMINI_API_KEY"),
        _ => None,
    }
}

/// The API key for `provider`, if set and non-empty.
pub fn api_key_from_env(provider: &str) -> Option<String> {
    let variable = api_key_variable(provider)?;
    std::env::var(variable).ok().filter(|key| !key.trim().is_empty())
}
