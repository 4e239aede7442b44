//! Shipping rate model

use serde::{Deserialize, Serialize};

/// Shipping rate document; `name` is the dedup key
///
/// Without `maximum_delivery_days` the rate promises a fixed day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ShippingRate {
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub minimum_delivery_days: i64,
    pub maximum_delivery_days: Option<i64>,
    pub rate: f64,
    pub created: i64,
    pub updated: i64,
}
