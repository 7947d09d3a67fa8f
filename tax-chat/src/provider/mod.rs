//! Upstream language-model providers.
//!
//! Each provider implements [`ChatProvider`]. Providers are built by a
//! [`ProviderFactory`] looked up by name in a [`ProviderRegistry`], so the
//! configured `provider = "..."` string selects the implementation at
//! start-up without the HTTP layer knowing which one it talks to.

mod gemini;
mod mistral;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiFactory, GeminiProvider};
pub use mistral::{MistralFactory, MistralProvider};

use crate::config::{ChatConfig, api_key_from_env};
use crate::history::ChatTurn;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider '{name}'; available: {available:?}")]
    UnknownProvider {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("{provider} API key not configured (set {variable})")]
    MissingApiKey {
        provider: &'static str,
        variable: &'static str,
    },

    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: u16,
    },

    #[error("unexpected {provider} response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

/// One chat completion: the system prompt, prior turns and the new message.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: &'a str,
    pub history: &'a [ChatTurn],
    pub message: &'a str,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Registry name, e.g. `"mistral"`.
    fn name(&self) -> &'static str;

    /// Sends one completion request and returns the raw reply text.
    async fn complete(
        &self,
        request: ChatRequest<'_>,
    ) -> Result<String, ProviderError>;
}

/// Everything a factory needs to build a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub name: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: Option<String>,
}

impl ProviderSettings {
    /// Settings from the config file plus the provider's key from the
    /// environment.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            name: config.provider.clone(),
            model: config.model.clone(),
            api_key: api_key_from_env(&config.provider),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            base_url: config.base_url.clone(),
        }
    }
}

pub trait ProviderFactory: Send + Sync {
    /// Unique, lowercase identifier for this provider.
    fn provider_name(&self) -> &'static str;

    fn create(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ChatProvider>, ProviderError>;
}

/// Registry of [`ProviderFactory`] instances, keyed by provider name.
pub struct ProviderRegistry {
    factories: HashMap<&'static str, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with every built-in provider registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MistralFactory));
        registry.register(Box::new(GeminiFactory));
        registry
    }

    /// Register a factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn ProviderFactory>,
    ) {
        self.factories.insert(factory.provider_name(), factory);
    }

    /// Names of every registered provider, sorted alphabetically.
    pub fn available_providers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build the provider named by `settings.name`.
    ///
    /// # Errors
    /// * [`ProviderError::UnknownProvider`] when nothing is registered under
    ///   that name.
    /// * Any error the factory itself returns.
    pub fn create(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ChatProvider>, ProviderError> {
        let factory = self.factories.get(settings.name.as_str()).ok_or_else(|| {
            ProviderError::UnknownProvider {
                name: settings.name.clone(),
                available: self.available_providers(),
            }
        })?;
        factory.create(settings)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared HTTP client for providers. No timeout is set; a slow upstream
/// holds only its own request.
pub(crate) fn http_client(provider: &'static str) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(concat!("tax-chat/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| ProviderError::Request { provider, source })
}

/// The API key, or the error naming the variable that should hold it.
pub(crate) fn require_key<'k>(
    key: &'k Option<String>,
    provider: &'static str,
) -> Result<&'k str, ProviderError> {
    key.as_deref().ok_or(ProviderError::MissingApiKey {
        provider,
        variable: crate::config::api_key_variable(provider).unwrap_or("API key variable"),
    })
}
