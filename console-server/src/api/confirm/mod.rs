//! Emailed link API module

mod handler;

use axum::Router;

use super::get_only;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirm/email", get_only(handler::confirm_email_query))
        .route("/confirm/email/{token}", get_only(handler::confirm_email_path))
        .route(
            "/confirm/resetpassword",
            get_only(handler::reset_password_query),
        )
        .route(
            "/confirm/resetpassword/{email}",
            get_only(handler::reset_password_path),
        )
}
