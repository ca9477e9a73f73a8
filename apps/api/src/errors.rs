use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::prompts::{ArtifactNotFound, MissingTemplateVariable};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// No usable prompt: either absent or failing its integrity check.
    #[error("Prompt not configured: {0}")]
    PromptNotConfigured(String),

    #[error(transparent)]
    MissingTemplateVariable(#[from] MissingTemplateVariable),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ArtifactNotFound> for AppError {
    fn from(e: ArtifactNotFound) -> Self {
        AppError::PromptNotConfigured(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::PromptNotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PROMPT_NOT_CONFIGURED",
                msg.clone(),
            ),
            AppError::MissingTemplateVariable(e) => (
                StatusCode::BAD_REQUEST,
                "MISSING_TEMPLATE_VARIABLE",
                e.to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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
