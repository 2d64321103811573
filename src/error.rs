//! Application error type and its HTTP rendering.
//!
//! [`AppError`] is the single error type returned by repositories and services.
//! Domain failures (invalid URL, duplicate code, missing or expired link) are
//! distinct variants so the request layer can map each one to its own status
//! code. Store and cache failures are carried through opaquely.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::infrastructure::cache::CacheError;

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

/// Machine-readable error code plus a human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("The URL '{0}' is not valid")]
    InvalidUrl(String),

    #[error("The short code '{0}' already exists")]
    ShortCodeAlreadyExists(String),

    #[error("The URL with short code '{0}' was not found")]
    NotFound(String),

    #[error("The URL with short code '{0}' has expired")]
    Expired(String),

    #[error("Failed to generate a unique short code after {attempts} attempts")]
    CodeGenerationFailed { attempts: usize },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ShortCodeAlreadyExists(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Expired(_) => StatusCode::GONE,
            Self::CodeGenerationFailed { .. } | Self::Database(_) | Self::Cache(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the serializable body.
    ///
    /// Internal failures get a generic message; the underlying cause only goes
    /// into `details` so nothing about the store layout leaks into `message`.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::InvalidUrl(url) => ErrorInfo {
                code: "invalid_url",
                message: self.to_string(),
                details: json!({ "url": url }),
            },
            Self::ShortCodeAlreadyExists(code) => ErrorInfo {
                code: "conflict",
                message: self.to_string(),
                details: json!({ "short_code": code }),
            },
            Self::NotFound(code) => ErrorInfo {
                code: "not_found",
                message: self.to_string(),
                details: json!({ "short_code": code }),
            },
            Self::Expired(code) => ErrorInfo {
                code: "expired",
                message: self.to_string(),
                details: json!({ "short_code": code }),
            },
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::CodeGenerationFailed { .. } | Self::Database(_) | Self::Cache(_) => ErrorInfo {
                code: "internal_error",
                message: "An internal server error occurred".to_string(),
                details: json!({ "reason": self.to_string() }),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::bad_request("Request validation failed", json!(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
