//! Admin account (public view)

use serde::{Deserialize, Serialize};

/// Signed-in admin as returned to the console; never carries the hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: String,
    pub email_verified: bool,
}
