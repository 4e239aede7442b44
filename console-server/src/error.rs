//! Unified service-layer error type
//!
//! `ServiceError` bridges document-store, object-store and mail failures to
//! the API-layer `AppError`, so handlers can propagate with `?`. Upstream
//! failures keep their raw message in the response body.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;
use crate::email::MailError;
use crate::storage::StorageError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum ServiceError {
    /// Document store error (sqlx, JSON columns)
    Db(BoxError),
    /// Object store error
    Storage(StorageError),
    /// Mail delivery error
    Mail(MailError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => ServiceError::App(AppError::not_found(msg)),
            RepoError::Duplicate(msg) => ServiceError::App(AppError::already_exists(msg)),
            RepoError::Validation(msg) => ServiceError::App(AppError::validation(msg)),
            RepoError::Database(msg) => ServiceError::Db(msg.into()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::Storage(e)
    }
}

impl From<MailError> for ServiceError {
    fn from(e: MailError) -> Self {
        ServiceError::Mail(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Document store error");
                AppError::with_message(ErrorCode::DatabaseError, db_err.to_string())
            }
            ServiceError::Storage(StorageError::NotConfigured) => {
                AppError::new(ErrorCode::ConfigError)
            }
            ServiceError::Storage(err) => {
                tracing::error!(error = %err, "Object store error");
                AppError::storage(err.to_string())
            }
            ServiceError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery error");
                AppError::mail(err.to_string())
            }
        }
    }
}

/// Lets handlers call repositories directly with `?`
impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        ServiceError::from(e).into()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_missing_storage_config_is_500() {
        let err: AppError = ServiceError::from(StorageError::NotConfigured).into();
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "A credential/property is missing");
    }

    #[test]
    fn test_db_error_keeps_raw_message() {
        let err: AppError = ServiceError::from(RepoError::Database("disk I/O error".into())).into();
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message, "disk I/O error");
    }

    #[test]
    fn test_repo_duplicate_is_conflict() {
        let err = AppError::from(RepoError::Duplicate("UNIQUE constraint failed".into()));
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_storage_backend_error_is_503() {
        let err: AppError =
            ServiceError::from(StorageError::Backend("timeout".into())).into();
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
