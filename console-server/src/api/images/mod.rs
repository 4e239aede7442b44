//! Image API module

mod handler;

use axum::Router;

use super::post_only;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image/delete", post_only(handler::delete_one))
        .route("/images/delete", post_only(handler::delete_many))
}
