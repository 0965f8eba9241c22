use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(e @ GatewayError::NotConnected) => {
                tracing::warn!("Rejected request: {e}");
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONNECTED", e.to_string())
            }
            AppError::Gateway(e @ GatewayError::NotConfigured(_)) => {
                tracing::warn!("Rejected request: {e}");
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", e.to_string())
            }
            // Storage and LLM messages are shown to the user as-is.
            AppError::Gateway(GatewayError::Storage(msg)) => {
                tracing::error!("Storage error: {msg}");
                (StatusCode::BAD_GATEWAY, "STORAGE_ERROR", msg.clone())
            }
            AppError::Gateway(GatewayError::Completion(msg)) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
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
