use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{
    ChatProvider, ChatRequest, ProviderError, ProviderFactory, ProviderSettings, http_client,
    require_key,
};

const NAME: &str = "mistral";
const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Mistral's chat completions API with bearer-token auth.
pub struct MistralProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl MistralProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let base = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Ok(Self {
            client: http_client(NAME)?,
            endpoint: format!("{}/v1/chat/completions", base.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    fn body<'a>(
        &'a self,
        request: &ChatRequest<'a>,
    ) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(Message {
            role: "system",
            content: request.system_prompt,
        });
        messages.extend(request.history.iter().map(|turn| Message {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(Message {
            role: "user",
            content: request.message,
        });

        CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl ChatProvider for MistralProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(
        &self,
        request: ChatRequest<'_>,
    ) -> Result<String, ProviderError> {
        let key = require_key(&self.api_key, NAME)?;
        let body = self.body(&request);
        debug!(model = %self.model, turns = body.messages.len(), "sending mistral request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, %detail, "mistral request rejected");
            return Err(ProviderError::Status {
                provider: NAME,
                status: status.as_u16(),
            });
        }

        let parsed: CompletionResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::InvalidResponse {
                    provider: NAME,
                    message: err.to_string(),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: NAME,
                message: "no choices in completion".to_string(),
            })
    }
}

pub struct MistralFactory;

impl ProviderFactory for MistralFactory {
    fn provider_name(&self) -> &'static str {
        NAME
    }

    fn create(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ChatProvider>, ProviderError> {
        Ok(Arc::new(MistralProvider::new(settings)?))
    }
}
