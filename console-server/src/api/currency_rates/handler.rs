//! Currency Rate API Handlers

use axum::Json;
use axum::extract::{Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode, SuccessBody};
use shared::models::CurrencyRate;
use shared::util::{now_millis, snowflake_id};

use crate::api::extract::{FetchQuery, JsonBody, edit_id, required, required_text};
use crate::db::repository::currency_rate as rate_repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CurrencyRatePayload {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub rate: Option<f64>,
}

fn check_rate(rate: f64) -> AppResult<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "rate must be greater than 0",
        ));
    }
    Ok(rate)
}

/// POST /api/currencyRates/save
pub async fn save(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CurrencyRatePayload>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let from = required_text(payload.from, "from")?;
    let to = required_text(payload.to, "to")?;
    let rate = check_rate(required(payload.rate, "rate")?)?;

    if rate_repo::find_by_pair(&state.pool, &from, &to)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("CurrencyRate already exists"));
    }

    let now = now_millis();
    let currency_rate = CurrencyRate {
        id: snowflake_id(),
        from,
        to,
        rate,
        created: now,
        updated: now,
    };
    rate_repo::insert(&state.pool, &currency_rate).await?;

    tracing::info!(from = %currency_rate.from, to = %currency_rate.to, rate, "Currency rate created");
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/currencyRates/edit
///
/// Only the rate changes; the currency pair is fixed once created.
pub async fn edit(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CurrencyRatePayload>,
) -> AppResult<Json<SuccessBody>> {
    let id = edit_id(payload.id.as_ref())?;
    let from = required_text(payload.from, "from")?;
    let to = required_text(payload.to, "to")?;
    let rate = check_rate(required(payload.rate, "rate")?)?;
    let gone =
        || AppError::no_longer_exists(format!("CurrencyRate from {from} to {to} no longer exists"));

    let id = id.ok_or_else(gone)?;
    let current = rate_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(gone)?;
    // the pair is part of the rate's identity
    if current.from != from || current.to != to {
        return Err(gone());
    }

    if rate_repo::update_rate(&state.pool, id, rate, now_millis()).await? == 0 {
        return Err(gone());
    }

    tracing::info!(from = %from, to = %to, rate, "Currency rate updated");
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CurrencyRateFetch {
    One(CurrencyRate),
    All(Vec<CurrencyRate>),
}

/// GET /api/currencyRates/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<CurrencyRateFetch>> {
    let Some(id) = query.id("CurrencyRate")? else {
        return Ok(Json(CurrencyRateFetch::All(
            rate_repo::find_all(&state.pool).await?,
        )));
    };
    let rate = rate_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CurrencyRate does not exist"))?;
    Ok(Json(CurrencyRateFetch::One(rate)))
}
