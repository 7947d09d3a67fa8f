use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::provider::ProviderError;

/// Errors returned by the chat endpoint.
///
/// Upstream details are logged and never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Upstream reply was empty after sanitising")]
    EmptyReply,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),

            ApiError::Provider(ProviderError::MissingApiKey { .. }) => {
                error!(error = %self, "chat provider is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Chat service is not configured".to_string(),
                )
            }

            ApiError::Provider(_) | ApiError::EmptyReply => {
                error!(error = %self, "chat provider failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to get a response from the chat service".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_keeps_its_message() {
        let response = ApiError::BadRequest("Message is required".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Message is required" }));
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let response = ApiError::MethodNotAllowed.into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn upstream_status_is_hidden_behind_generic_500() {
        let err = ApiError::from(ProviderError::Status {
            provider: "mistral",
            status: 401,
        });

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to get a response from the chat service");
        assert!(!body.to_string().contains("401"));
    }

    #[tokio::test]
    async fn missing_key_is_500_without_variable_name() {
        let err = ApiError::from(ProviderError::MissingApiKey {
            provider: "mistral",
            variable: "MISTRAL_API_KEY",
        });

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Chat service is not configured" })
        );
    }
}
