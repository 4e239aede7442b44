//! Repository Module
//!
//! Free functions over any SQLite executor: pass the pool for standalone
//! reads and writes, or `&mut *conn` inside a transaction.

pub mod admin;
pub mod category;
pub mod currency;
pub mod currency_rate;
pub mod order;
pub mod product;
pub mod promo_code;
pub mod shipping_rate;
pub mod token_blacklist;

pub use super::{RepoError, RepoResult};
