//! Clinic service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients stay generic for internal failures; the actual cause is
//! logged server-side. Form validation problems are not errors: they are
//! rendered back into the form view (see `views`).

use crate::models::ModelError;
use crate::observability::metrics::record_error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Clinic service error type.
///
/// Maps to HTTP status codes:
/// - Database, Internal: 500 Internal Server Error
/// - NotFound: 404 Not Found
/// - BadRequest: 400 Bad Request
/// - ServiceUnavailable: 503 Service Unavailable
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

impl ClinicError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ClinicError::Database(_) | ClinicError::Internal => 500,
            ClinicError::NotFound(_) => 404,
            ClinicError::BadRequest(_) => 400,
            ClinicError::ServiceUnavailable(_) => 503,
        }
    }

    /// Short error kind used as a bounded metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            ClinicError::Database(_) => "database",
            ClinicError::NotFound(_) => "not_found",
            ClinicError::BadRequest(_) => "bad_request",
            ClinicError::ServiceUnavailable(_) => "service_unavailable",
            ClinicError::Internal => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ClinicError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ClinicError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "clinic.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            ClinicError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            ClinicError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            ClinicError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "clinic.availability", reason = %reason, "Service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            ClinicError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        record_error(self.kind());

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert sqlx errors to ClinicError
impl From<sqlx::Error> for ClinicError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ClinicError::ServiceUnavailable(err.to_string())
            }
            _ => ClinicError::Database(err.to_string()),
        }
    }
}

impl From<ModelError> for ClinicError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownPet { pet_id } => {
                ClinicError::NotFound(format!("Pet {} not found", pet_id))
            }
        }
    }
}
