/// Unified error types for the catalog API
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Authentication errors (missing/invalid token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authorization errors (token subject does not own the resource)
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Input validation errors
    #[error("{0}")]
    Validation(String),

    /// Business-rule conflicts (duplicate user, duplicate bookmark)
    #[error("{0}")]
    Conflict(String),

    /// Credential failures. One message for unknown email and wrong
    /// password so callers cannot tell which check failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Not found errors
    #[error("{0}")]
    NotFound(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: 400/401/403/404 carry `message` only, 500 adds the
/// underlying error text in `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ApiError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, self.to_string(), None)
            }
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string(), None),
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, self.to_string(), None)
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string(), None),
            ApiError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                Some(e.to_string()),
            ),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                Some(e.clone()),
            ),
        };

        let body = Json(ErrorBody {
            message,
            error: detail,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
