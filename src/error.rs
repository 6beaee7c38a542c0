//! Error types for Setu
//!
//! Only malformed input, unsupported methods and configuration problems reach
//! the HTTP boundary as non-200 statuses. Upstream failures are absorbed by the
//! fallback executor and never show up here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::JsonError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Outcome label for `setu_requests_total`
    pub fn metric_label(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) | AppError::JsonError(_) | AppError::MethodNotAllowed => {
                "rejected"
            }
            AppError::Configuration(_) => "unconfigured",
            AppError::Internal(_) => "error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::InvalidRequest(msg) => ("INVALID_REQUEST", msg.clone()),
            AppError::MethodNotAllowed => ("METHOD_NOT_ALLOWED", self.to_string()),
            AppError::Configuration(msg) => ("CONFIGURATION_ERROR", msg.clone()),
            AppError::JsonError(e) => ("INVALID_JSON", format!("Invalid JSON body: {}", e)),
            AppError::Internal(_) => ("INTERNAL_ERROR", "Internal server error".to_string()),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
