//! Data models
//!
//! Wire shapes of the console documents. Field names are camelCase on the
//! wire; ids are `i64` snowflakes and accept the `_id` alias on input.
//! Flat row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod admin;
pub mod category;
pub mod currency;
pub mod image_ref;
pub mod order;
pub mod product;
pub mod promo_code;
pub mod shipping_rate;

// Re-exports
pub use admin::*;
pub use category::*;
pub use currency::*;
pub use image_ref::*;
pub use order::*;
pub use product::*;
pub use promo_code::*;
pub use shipping_rate::*;
