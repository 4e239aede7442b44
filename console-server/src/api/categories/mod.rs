//! Category API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories/save", post_only(handler::save))
        .route("/categories/edit", post_only(handler::edit))
        .route("/categories/fetch", get_only(handler::fetch))
}
