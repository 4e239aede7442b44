//! Order API module (read-only)

mod handler;

use axum::Router;

use super::get_only;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/orders/fetch", get_only(handler::fetch))
}
