use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, header},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::history::{ChatTurn, recent_turns};
use crate::prompt::SystemPrompt;
use crate::provider::{ChatProvider, ChatRequest};
use crate::sanitize::sanitize_reply;
use crate::topic::{Topic, detect_topic};

/// Immutable state shared by every request.
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub system_prompt: SystemPrompt,
    pub max_history_turns: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    message: Option<String>,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatbotResponse {
    pub reply: String,
    pub topic: Topic,
}

/// The complete HTTP application: `POST /api/chatbot` behind CORS for a
/// single origin and request tracing.
pub fn app(
    state: Arc<AppState>,
    allowed_origin: HeaderValue,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/chatbot", post(chatbot).fallback(method_not_allowed))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn chatbot(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatbotRequest>, JsonRejection>,
) -> ApiResult<Json<ChatbotResponse>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let history = recent_turns(&request.history, state.max_history_turns);
    let topic = detect_topic(message);
    info!(
        %topic,
        provider = state.provider.name(),
        history = history.len(),
        "chat request"
    );

    let raw = state
        .provider
        .complete(ChatRequest {
            system_prompt: state.system_prompt.as_str(),
            history: &history,
            message,
        })
        .await?;

    let reply = sanitize_reply(&raw);
    if reply.is_empty() {
        return Err(ApiError::EmptyReply);
    }

    Ok(Json(ChatbotResponse { reply, topic }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
