//! # API Error Types
//!
//! [`AppError`] implements `IntoResponse` and maps the domain errors of
//! every workspace crate onto HTTP status codes. Bodies have the shape
//! `{"error": {"code", "message", "details?"}}`. Internal and upstream
//! messages are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use cea_backend::{BackendError, LoginError};
use cea_compliance::{ApprovalError, RecordEntryError};
use cea_forms::{FormsError, WizardError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field problems for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Business-rule validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Validation failed on specific fields (422, with details).
    #[error("validation error: {message}")]
    InvalidFields {
        message: String,
        details: serde_json::Value,
    },

    /// Body could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, unknown or expired session (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient role or no valid license (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),

    /// Backend returned an error or is unreachable (502).
    #[error("upstream backend error: {0}")]
    UpstreamError(String),

    /// Backend not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::InvalidFields { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// The message without the variant prefix.
    fn client_message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::Validation(m)
            | Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Conflict(m)
            | Self::Internal(m)
            | Self::UpstreamError(m)
            | Self::ServiceUnavailable(m) => m,
            Self::InvalidFields { message, .. } => message,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::ServiceUnavailable(msg.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::UpstreamError(_) => "An upstream service error occurred".to_string(),
            other => other.client_message().to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::UpstreamError(_) => tracing::error!(error = %self, "upstream backend error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let details = match self {
            Self::InvalidFields { details, .. } => Some(details),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<cea_core::ValidationError> for AppError {
    fn from(err: cea_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<FormsError> for AppError {
    fn from(err: FormsError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<RecordEntryError> for AppError {
    fn from(err: RecordEntryError) -> Self {
        Self::InvalidFields {
            message: "CPD record has invalid fields".to_string(),
            details: serde_json::json!({ "fields": err.issues() }),
        }
    }
}

impl From<ApprovalError> for AppError {
    fn from(err: ApprovalError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::MissingFields { category, errors } => Self::InvalidFields {
                message: format!("required fields missing in {category}"),
                details: serde_json::json!({ "fields": errors }),
            },
            WizardError::WrongStep { .. } => Self::Conflict(err.to_string()),
            WizardError::NotOptional { .. } => Self::Validation(err.to_string()),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        if err.is_unauthorized() {
            Self::Unauthorized("backend session expired; sign in again".to_string())
        } else {
            Self::UpstreamError(err.to_string())
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Rejected(message) => Self::Unauthorized(message),
            LoginError::NoValidLicense => Self::Forbidden(err.to_string()),
            LoginError::Backend(e) => Self::UpstreamError(e.to_string()),
        }
    }
}
