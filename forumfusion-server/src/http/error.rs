//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Auth failures keep the bare `{"message": ...}` body that clients match on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::repos::DbError;
use crate::models::ValidationError;
use crate::payments::PaymentError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body or query string could not be parsed (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint hit (409)
    Conflict { resource: &'static str, id: String },

    /// Missing or invalid session token (401)
    Unauthorized,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// Payments not configured (503)
    PaymentUnavailable,

    /// Payment provider failed (502, logged)
    Payment(PaymentError),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500)
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": message
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Conflict { resource, id } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": format!("{} '{}' already exists", resource, id)
                }),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Unauthorized access!" }),
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "message": "Forbidden access!" }),
            ),
            Self::PaymentUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "payments_unavailable",
                    "message": "payments are not configured"
                }),
            ),
            Self::Payment(e) => {
                tracing::error!("Payment provider error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "payment_error",
                        "message": "payment provider request failed"
                    }),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { resource, id } => Self::Conflict { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidAmount { reason } => {
                Self::Validation(ValidationError::OutOfRange { field: "price", reason })
            }
            _ => Self::Payment(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken | AuthError::InvalidToken(_) => Self::Unauthorized,
            AuthError::Signing(_) => Self::Internal { message: e.to_string() },
        }
    }
}
