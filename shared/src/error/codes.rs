//! Error codes for the admin console
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Catalog errors (categories, products, images)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value so clients can switch on it without
/// parsing the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists (dedup key taken)
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Document referenced by an edit was removed in the meantime
    NoLongerExists = 9,
    /// HTTP method not supported by the route
    MethodNotAllowed = 10,

    // ==================== 1xxx: Auth ====================
    /// Admin is not signed in
    NotAuthenticated = 1001,
    /// Invalid email/password pair
    InvalidCredentials = 1002,
    /// Link token has expired
    TokenExpired = 1003,
    /// Link token is invalid
    TokenInvalid = 1004,
    /// Link token was already consumed
    LinkAlreadyUsed = 1005,
    /// Email address not confirmed yet
    EmailNotVerified = 1006,

    // ==================== 6xxx: Catalog ====================
    /// Product does not carry one value per inherited property
    PropertyValuesMissing = 6001,
    /// Parent assignment would make a category its own ancestor
    CategoryCycle = 6002,
    /// Entity must keep at least one image
    ImageRequired = 6101,
    /// Entity image limit exceeded
    ImageLimitExceeded = 6102,
    /// Uploaded file is not a supported image
    UnsupportedImage = 6103,
    /// Uploaded image exceeds the size ceiling
    ImageTooLarge = 6104,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Document store error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Object store error
    StorageError = 9004,
    /// Mail delivery error
    MailError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::NoLongerExists => "Resource no longer exists",
            ErrorCode::MethodNotAllowed => "Method not supported",

            // Auth
            ErrorCode::NotAuthenticated => "Please login to access this service",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Sorry. This link has already expired",
            ErrorCode::TokenInvalid => "Sorry. Unfortunately this link is invalid.",
            ErrorCode::LinkAlreadyUsed => "Sorry. Unfortunately this link has already been used.",
            ErrorCode::EmailNotVerified => "Email not verified",

            // Catalog
            ErrorCode::PropertyValuesMissing => "One or more property values missing",
            ErrorCode::CategoryCycle => "A category cannot be its own ancestor",
            ErrorCode::ImageRequired => "at least one image required",
            ErrorCode::ImageLimitExceeded => "Too many images",
            ErrorCode::UnsupportedImage => "File is not a supported image",
            ErrorCode::ImageTooLarge => "Image is too large",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "A credential/property is missing",
            ErrorCode::StorageError => "Object store error",
            ErrorCode::MailError => "Mail delivery failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown `u16` into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::NoLongerExists),
            10 => Ok(ErrorCode::MethodNotAllowed),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::LinkAlreadyUsed),
            1006 => Ok(ErrorCode::EmailNotVerified),

            // Catalog
            6001 => Ok(ErrorCode::PropertyValuesMissing),
            6002 => Ok(ErrorCode::CategoryCycle),
            6101 => Ok(ErrorCode::ImageRequired),
            6102 => Ok(ErrorCode::ImageLimitExceeded),
            6103 => Ok(ErrorCode::UnsupportedImage),
            6104 => Ok(ErrorCode::ImageTooLarge),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::StorageError),
            9005 => Ok(ErrorCode::MailError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_through_u16() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::NoLongerExists,
            ErrorCode::LinkAlreadyUsed,
            ErrorCode::ImageRequired,
            ErrorCode::MailError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::ImageRequired).unwrap();
        assert_eq!(json, "6101");
    }
}
