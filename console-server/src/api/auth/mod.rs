//! Auth API module

mod handler;

use axum::Router;

use super::{get_only, post_only};
use crate::state::AppState;

/// Public account routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post_only(handler::signup))
        .route("/auth/login", post_only(handler::login))
        .route("/auth/logout", post_only(handler::logout))
        .route("/auth/changepassword", post_only(handler::change_password))
}

/// Session probe, mounted behind the admin guard
pub fn session_router() -> Router<AppState> {
    Router::new().route("/auth/session", get_only(handler::session))
}
