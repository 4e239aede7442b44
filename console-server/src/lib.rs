//! console-server: backend of the e-commerce admin console
//!
//! Catalog management (categories with inherited properties, products,
//! their images), store settings (currencies, exchange rates, promo codes,
//! shipping rates), a read-only order view and admin accounts.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod storage;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
