//! Unified error system for the admin console
//!
//! - [`ErrorCode`]: standardized error codes, mapped to HTTP statuses
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code plus the message shown to the admin
//!
//! Every failure leaves the server as `{"error": "<message>"}`.
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::already_exists("Currency already exists");
//! assert_eq!(err.code, ErrorCode::AlreadyExists);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody, SuccessBody};
