//! API error type with IntoResponse
//!
//! Every failure becomes `{"error": <kind>, "message": <detail>}` with the
//! matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::error::Error;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Duplicate or stale write (409)
    Conflict { message: String },

    /// Caller does not own the resource (403)
    Forbidden { reason: String },

    /// Missing or bad bearer token (401)
    Unauthorized(AuthError),

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    /// Status code and error kind for this variant.
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.parts();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict { message } => message,
            Self::Forbidden { reason } => reason,
            Self::Unauthorized(e) => {
                tracing::warn!("Rejected request: {}", e);
                "authentication required".to_string()
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "an internal error occurred".to_string()
            }
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Unauthorized(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Error::from(e).into()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(e) => Self::Validation(e),
            Error::NotFound { resource, id } => Self::NotFound { resource, id },
            Error::Forbidden(reason) => Self::Forbidden { reason },
            Error::Conflict(message) => Self::Conflict { message },
            Error::Database(e) => Self::Database(e),
        }
    }
}
