//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::NoLongerExists | Self::ImageRequired => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 403 Forbidden (link tokens, unverified accounts)
            Self::TokenExpired
            | Self::TokenInvalid
            | Self::LinkAlreadyUsed
            | Self::EmailNotVerified => StatusCode::FORBIDDEN,

            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 503 Service Unavailable (upstream I/O, client can retry)
            Self::DatabaseError | Self::StorageError | Self::MailError => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_family_is_bad_request() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::RequiredField,
            ErrorCode::PropertyValuesMissing,
            ErrorCode::ImageLimitExceeded,
            ErrorCode::UnsupportedImage,
            ErrorCode::ImageTooLarge,
            ErrorCode::CategoryCycle,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST, "{code:?}");
        }
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::NoLongerExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ImageRequired.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_is_service_unavailable() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::StorageError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::ConfigError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
