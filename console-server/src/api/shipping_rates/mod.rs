//! Shipping rate API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shippingRates/save", post_only(handler::save))
        .route("/shippingRates/edit", post_only(handler::edit))
        .route("/shippingRates/fetch", get_only(handler::fetch))
}
