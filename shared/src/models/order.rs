//! Order Model
//!
//! Orders are written by the storefront; the console only lists them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIVERY_STATUS: &str = "PENDING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: i64,
    pub order_id: String,
    pub user_email: String,
    /// Line items as captured at checkout
    #[serde(default)]
    pub products: Vec<serde_json::Value>,
    pub sub_total: f64,
    pub total: f64,
    pub shipping_rate: String,
    pub shipping_fee: f64,
    pub payment_id: String,
    pub payment_method: String,
    pub payment_status: String,
    pub delivery_status: String,
    #[serde(default)]
    pub discount: f64,
    pub promocode: Option<String>,
    pub currency: String,
    pub created: i64,
    pub updated: i64,
}
