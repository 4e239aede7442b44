//! Error type and JSON response bodies

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with a structured code and a human-readable message
///
/// The message is what the console renders next to the form field, so
/// handlers pick it with care; the code only drives the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn required(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RequiredField, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, msg)
    }

    /// Dedup key already taken (`"Currency already exists"`)
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// The document an edit points at has disappeared
    pub fn no_longer_exists(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NoLongerExists, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::MailError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Failure body: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.message.clone(),
        }
    }
}

/// Success body for writes: `{"success": true}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        if matches!(self.code.category(), ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new_uses_default_message() {
        let err = AppError::new(ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "Please login to access this service");
        assert_eq!(err.http_status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(
            AppError::already_exists("Currency already exists").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::no_longer_exists("Promocode no longer exists").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::required("Id is missing").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::storage("bucket unreachable").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_body_shape() {
        let err = AppError::already_exists("Currency already exists");
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Currency already exists" }));
    }

    #[test]
    fn test_success_body_shape() {
        let json = serde_json::to_value(SuccessBody::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }
}
