//! Admin authentication
//!
//! - [`session`]: session JWT carried in the console cookie, and the
//!   middleware guarding every admin route
//! - [`tokens`]: single-purpose link tokens (email confirmation, password reset)
//! - [`password`]: argon2 hashing
//! - [`links`]: the confirmation and reset mails carrying link tokens

pub mod links;
pub mod password;
pub mod session;
pub mod tokens;

pub use session::{AdminIdentity, require_admin};
pub use tokens::LinkPurpose;
