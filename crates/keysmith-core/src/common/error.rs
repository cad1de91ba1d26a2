//! Error types for the provisioning service.
//!
//! This module defines the central `Error` enum, which captures all
//! reportable error cases within the key provisioning system. It implements
//! [`IntoResponse`] so handlers can propagate errors directly to HTTP
//! callers with appropriate status codes.
//!
//! ## Error Cases
//! - `Persistence`: The record store was unavailable or rejected a write.
//! - `Generation`: Key production failed in the generator backend.
//! - `NotFound`: A status query named an unknown correlation id.
//! - `Validation`: The client request was malformed or exceeded bounds.
//! - `Shutdown`: A submission arrived while the service was shutting down.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the key provisioning service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The record store was unavailable or rejected an operation.
    #[error("Persistence error: {context}")]
    Persistence { context: String },

    /// The key generator backend failed to produce a value.
    #[error("Key generation error: {context}")]
    Generation { context: String },

    /// No request exists for the queried correlation id.
    #[error("Request not found")]
    NotFound,

    /// The client request was invalid or exceeded constraints.
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    Shutdown,
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence {
            context: err.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Error::Validation { reason } => (StatusCode::UNPROCESSABLE_ENTITY, reason),
            Error::NotFound => (StatusCode::NOT_FOUND, "Request not found".to_string()),
            Error::Shutdown => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service is shutting down".to_string(),
            ),
            // Internal fault detail is logged where it occurs and never
            // surfaced to external callers.
            Error::Persistence { .. } | Error::Generation { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
