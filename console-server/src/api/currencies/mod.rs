//! Currency API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/currencies/save", post_only(handler::save))
        .route("/currencies/edit", post_only(handler::edit))
        .route("/currencies/fetch", get_only(handler::fetch))
}
