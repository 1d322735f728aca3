// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// API error types
///
/// Authentication and authorization failures are distinct tagged variants so
/// callers (and the session gate) can branch on kind rather than parsing
/// message text.
#[derive(Debug)]
pub enum ApiError {
    NotLoggedIn,
    NotAdmin,
    NotModerator,
    InsufficientPermission(String),
    UserNotFound(String),
    InvalidAction(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
    StorageError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotLoggedIn => write!(f, "Not logged in"),
            ApiError::NotAdmin => write!(f, "Admin or moderator role required"),
            ApiError::NotModerator => write!(f, "Moderator role required"),
            ApiError::InsufficientPermission(msg) => {
                write!(f, "Insufficient permission: {}", msg)
            }
            ApiError::UserNotFound(msg) => write!(f, "User not found: {}", msg),
            ApiError::InvalidAction(msg) => write!(f, "Invalid action: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

impl ApiError {
    /// Redirect target for page-level flows that cannot render an error.
    ///
    /// `NotLoggedIn` goes to the sign-in page, role failures go to the
    /// unauthorized page, and every unmapped kind falls back to sign-in.
    pub fn redirect_target(&self) -> &'static str {
        match self {
            ApiError::NotAdmin | ApiError::NotModerator => "/unauthorized",
            _ => "/signin",
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::NotLoggedIn => (
                StatusCode::UNAUTHORIZED,
                "Login required".to_string(),
                "NOT_LOGGED_IN",
            ),
            ApiError::NotAdmin => (
                StatusCode::FORBIDDEN,
                "Admin or moderator role required".to_string(),
                "NOT_ADMIN",
            ),
            ApiError::NotModerator => (
                StatusCode::FORBIDDEN,
                "Moderator role required".to_string(),
                "NOT_MODERATOR",
            ),
            ApiError::InsufficientPermission(msg) => {
                (StatusCode::FORBIDDEN, msg, "INSUFFICIENT_PERMISSION")
            }
            ApiError::UserNotFound(msg) => (StatusCode::NOT_FOUND, msg, "USER_NOT_FOUND"),
            ApiError::InvalidAction(msg) => (StatusCode::BAD_REQUEST, msg, "INVALID_ACTION"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
            ApiError::StorageError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "STORAGE_ERROR")
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid() {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}
