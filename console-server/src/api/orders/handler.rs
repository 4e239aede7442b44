//! Order API Handlers

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::Order;

use crate::api::extract::FetchQuery;
use crate::db::repository::order as order_repo;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OrderFetch {
    One(Order),
    All(Vec<Order>),
}

/// GET /api/orders/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<OrderFetch>> {
    let Some(id) = query.id("Order")? else {
        return Ok(Json(OrderFetch::All(order_repo::find_all(&state.pool).await?)));
    };
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order does not exist"))?;
    Ok(Json(OrderFetch::One(order)))
}
