//! HTTP API of the admin console
//!
//! Everything except `/health` is nested under `/api`. Catalog, settings and
//! order routes sit behind [`require_admin`]; signup, login and the emailed
//! links are public.

pub mod extract;

mod auth;
mod categories;
mod confirm;
mod currencies;
mod currency_rates;
mod health;
mod images;
mod orders;
mod products;
mod promo_codes;
mod shipping_rates;

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::{MethodRouter, get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::catalog::ImageOwner;
use crate::state::AppState;
use extract::method_not_allowed;

/// POST route answering other methods with a JSON 405
pub(crate) fn post_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    post(handler).fallback(method_not_allowed)
}

/// GET route answering other methods with a JSON 405
pub(crate) fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).fallback(method_not_allowed)
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    // Room for a full image set plus the text fields of the form
    let body_limit = state.config.max_image_bytes * ImageOwner::Product.max_images() + 1024 * 1024;

    let admin_routes = Router::new()
        .merge(categories::router())
        .merge(products::router())
        .merge(currencies::router())
        .merge(currency_rates::router())
        .merge(promo_codes::router())
        .merge(shipping_rates::router())
        .merge(images::router())
        .merge(orders::router())
        .merge(auth::session_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public_routes = Router::new()
        .merge(auth::router())
        .merge(confirm::router());

    Router::new()
        .merge(health::router())
        .nest("/api", admin_routes.merge(public_routes))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
