//! Currency rate API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/currencyRates/save", post_only(handler::save))
        .route("/currencyRates/edit", post_only(handler::edit))
        .route("/currencyRates/fetch", get_only(handler::fetch))
}
