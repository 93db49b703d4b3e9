use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
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
    #[error("Validation error: {0}")]
    Validation(String),

    /// An extractor refused the request body (bad JSON, wrong content type).
    #[error("Rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The model's answer could not be interpreted. `raw` keeps the untouched text.
    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("Invalid percentage '{value}' for field '{field}'")]
    InvalidPercentage {
        field: String,
        value: String,
        raw: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps an axum extractor rejection onto the error taxonomy, keeping its status.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else if status.is_server_error() {
            AppError::Internal(message)
        } else {
            AppError::Rejected { status, message }
        }
    }

    pub fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        AppError::MalformedResponse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Raw model output attached to the error, if the failure happened after a completion.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AppError::MalformedResponse { raw, .. } | AppError::InvalidPercentage { raw, .. } => {
                Some(raw.as_str())
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Rejected { status, message } => (*status, "INVALID_REQUEST", message.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Extraction(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                format!("Could not read text from the uploaded document: {msg}"),
            ),
            AppError::Template(msg) => (StatusCode::BAD_REQUEST, "TEMPLATE_ERROR", msg.clone()),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The analysis service could not be reached".to_string(),
                )
            }
            AppError::MalformedResponse { reason, .. } => {
                tracing::warn!("Malformed model response: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    format!("The analysis service returned an unreadable answer: {reason}"),
                )
            }
            AppError::InvalidPercentage { field, value, .. } => {
                tracing::warn!("Invalid percentage in '{field}': {value}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_PERCENTAGE",
                    format!("'{field}' must be a number between 0 and 100, got '{value}'"),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(raw) = self.raw_response() {
            error["raw_response"] = json!(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::from_rejection(err.status(), err.body_text())
    }
}
