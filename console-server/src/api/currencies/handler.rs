//! Currency API Handlers

use axum::Json;
use axum::extract::{Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, SuccessBody};
use shared::models::Currency;
use shared::util::{now_millis, snowflake_id};

use crate::api::extract::{FetchQuery, JsonBody, edit_id, required_text};
use crate::db::repository::currency as currency_repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPayload {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub symbol: Option<String>,
}

struct CurrencyFields {
    name: String,
    short_name: String,
    symbol: String,
}

impl CurrencyPayload {
    fn fields(self) -> AppResult<CurrencyFields> {
        Ok(CurrencyFields {
            name: required_text(self.name, "name")?,
            short_name: required_text(self.short_name, "shortName")?,
            symbol: required_text(self.symbol, "symbol")?,
        })
    }
}

/// POST /api/currencies/save
pub async fn save(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CurrencyPayload>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let fields = payload.fields()?;

    if currency_repo::find_by_name(&state.pool, &fields.name)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Currency already exists"));
    }

    let now = now_millis();
    let currency = Currency {
        id: snowflake_id(),
        name: fields.name,
        short_name: fields.short_name,
        symbol: fields.symbol,
        created: now,
        updated: now,
    };
    currency_repo::insert(&state.pool, &currency).await?;

    tracing::info!(currency = %currency.name, id = currency.id, "Currency created");
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/currencies/edit
pub async fn edit(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CurrencyPayload>,
) -> AppResult<Json<SuccessBody>> {
    let id = edit_id(payload.id.as_ref())?;
    let fields = payload.fields()?;
    let gone = || AppError::no_longer_exists(format!("Currency {} no longer exists", fields.name));

    let Some(id) = id else {
        return Err(gone());
    };
    let current = currency_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(gone)?;

    if fields.name != current.name
        && currency_repo::find_by_name(&state.pool, &fields.name)
            .await?
            .is_some_and(|other| other.id != id)
    {
        return Err(AppError::already_exists("Currency already exists"));
    }

    let currency = Currency {
        name: fields.name,
        short_name: fields.short_name,
        symbol: fields.symbol,
        updated: now_millis(),
        ..current
    };
    if currency_repo::update(&state.pool, &currency).await? == 0 {
        return Err(AppError::no_longer_exists(format!(
            "Currency {} no longer exists",
            currency.name
        )));
    }

    tracing::info!(currency = %currency.name, id, "Currency updated");
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CurrencyFetch {
    One(Currency),
    All(Vec<Currency>),
}

/// GET /api/currencies/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<CurrencyFetch>> {
    let Some(id) = query.id("Currency")? else {
        return Ok(Json(CurrencyFetch::All(
            currency_repo::find_all(&state.pool).await?,
        )));
    };
    let currency = currency_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Currency does not exist"))?;
    Ok(Json(CurrencyFetch::One(currency)))
}
