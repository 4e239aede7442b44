//! Product Model

use super::ImageRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product document
///
/// `category` and `currency` are business keys (category name, currency
/// short name), not ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub contents: String,
    pub price: f64,
    pub currency: String,
    pub category: String,
    /// Property name -> selected value
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub created: i64,
    pub updated: i64,
}
