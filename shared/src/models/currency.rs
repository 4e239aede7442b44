//! Currency and exchange rate models

use serde::{Deserialize, Serialize};

/// Currency document; `name` is the dedup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub symbol: String,
    pub created: i64,
    pub updated: i64,
}

/// Exchange rate between two currency short names; `(from, to)` is the dedup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CurrencyRate {
    #[serde(alias = "_id")]
    pub id: i64,
    #[cfg_attr(feature = "db", sqlx(rename = "from_currency"))]
    pub from: String,
    #[cfg_attr(feature = "db", sqlx(rename = "to_currency"))]
    pub to: String,
    pub rate: f64,
    pub created: i64,
    pub updated: i64,
}
