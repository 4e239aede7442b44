//! Health check endpoint

use axum::{Json, Router};

use super::get_only;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get_only(health_check))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "console-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
