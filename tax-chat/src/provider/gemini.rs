use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{
    ChatProvider, ChatRequest, ProviderError, ProviderFactory, ProviderSettings, http_client,
    require_key,
};
use crate::history::ChatRole;

const NAME: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Google's `generateContent` API, keyed by the `x-goog-api-key` header.
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let base = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Ok(Self {
            client: http_client(NAME)?,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base.trim_end_matches('/'),
                settings.model
            ),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    fn body<'a>(
        &self,
        request: &ChatRequest<'a>,
    ) -> GenerateRequest<'a> {
        // Gemini calls the assistant side "model".
        let mut contents: Vec<Content<'a>> = request
            .history
            .iter()
            .map(|turn| Content {
                role: Some(match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                }),
                parts: vec![Part {
                    text: &turn.content,
                }],
            })
            .collect();
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part {
                text: request.message,
            }],
        });

        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_prompt,
                }],
            },
            contents,
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: self.max_tokens,
            },
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(
        &self,
        request: ChatRequest<'_>,
    ) -> Result<String, ProviderError> {
        let key = require_key(&self.api_key, NAME)?;
        let body = self.body(&request);
        debug!(model = %self.model, turns = body.contents.len(), "sending gemini request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", key)
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
            error!(%status, %detail, "gemini request rejected");
            return Err(ProviderError::Status {
                provider: NAME,
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::InvalidResponse {
                    provider: NAME,
                    message: err.to_string(),
                })?;

        // A candidate blocked by the safety settings has no content.
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: NAME,
                message: "no text in first candidate".to_string(),
            })
    }
}

pub struct GeminiFactory;

impl ProviderFactory for GeminiFactory {
    fn provider_name(&self) -> &'static str {
        NAME
    }

    fn create(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ChatProvider>, ProviderError> {
        Ok(Arc::new(GeminiProvider::new(settings)?))
    }
}
