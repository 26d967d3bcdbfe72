use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("A generation token is required. Enter your access token to continue.")]
    MissingCredential,

    #[error("Generation service request failed: {0}")]
    Transport(String),

    #[error("Generation service returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(_) | LlmError::Api { .. } => AppError::Transport(err.to_string()),
            LlmError::EmptyContent | LlmError::MissingJsonArray | LlmError::Parse(_) => {
                AppError::MalformedResponse(err.to_string())
            }
        }
    }
}

impl AppError {
    /// Generation-path failures are shown to the student as a dismissible notice.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            AppError::MissingCredential | AppError::Transport(_) | AppError::MalformedResponse(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            AppError::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL"),
            AppError::Transport(msg) => {
                tracing::error!("Generation transport error: {msg}");
                (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR")
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed generation response: {msg}");
                (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            _ => message,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
