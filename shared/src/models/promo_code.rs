//! Promo code model

use serde::{Deserialize, Serialize};

/// Promo code document; `code` is the dedup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    #[serde(alias = "_id")]
    pub id: i64,
    pub code: String,
    /// Datetime string as entered in the console
    pub valid_until: String,
    pub discount_percent: i64,
    pub created: i64,
    pub updated: i64,
}
