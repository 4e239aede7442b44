//! Promo code API module

mod handler;

use axum::Router;
use axum::routing::get;

use super::{get_only, post_only};
use crate::api::extract::method_not_allowed;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/promocodes/save", post_only(handler::save))
        .route("/promocodes/edit", post_only(handler::edit))
        .route("/promocodes/fetch", get_only(handler::fetch))
        .route(
            "/promocodes/delete/{id}",
            get(handler::delete)
                .delete(handler::delete)
                .fallback(method_not_allowed),
        )
}
