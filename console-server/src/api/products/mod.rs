//! Product API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/save", post_only(handler::save))
        .route("/products/edit", post_only(handler::edit))
        .route("/products/fetch", get_only(handler::fetch))
}
