//! Promo Code API Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode, SuccessBody};
use shared::models::PromoCode;
use shared::util::{now_millis, parse_id, snowflake_id};

use crate::api::extract::{FetchQuery, JsonBody, edit_id, required, required_text};
use crate::db::repository::promo_code as promo_repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodePayload {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    pub code: Option<String>,
    pub valid_until: Option<String>,
    pub discount_percent: Option<i64>,
}

/// Accepts RFC 3339, a `datetime-local` value or a bare date
fn check_valid_until(raw: String) -> AppResult<String> {
    let parses = DateTime::parse_from_rfc3339(&raw).is_ok()
        || NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_ok();
    if !parses {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "validUntil must be a valid date",
        ));
    }
    Ok(raw)
}

fn check_discount(percent: i64) -> AppResult<i64> {
    if !(1..=100).contains(&percent) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "discountPercent must be between 1 and 100",
        ));
    }
    Ok(percent)
}

fn gone() -> AppError {
    AppError::no_longer_exists("Promocode no longer exists")
}

/// POST /api/promocodes/save
pub async fn save(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PromoCodePayload>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let code = required_text(payload.code, "code")?;
    let valid_until = check_valid_until(required_text(payload.valid_until, "validUntil")?)?;
    let discount_percent = check_discount(required(payload.discount_percent, "discountPercent")?)?;

    if promo_repo::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::already_exists("Promo code already exists"));
    }

    let now = now_millis();
    let promo = PromoCode {
        id: snowflake_id(),
        code,
        valid_until,
        discount_percent,
        created: now,
        updated: now,
    };
    promo_repo::insert(&state.pool, &promo).await?;

    tracing::info!(code = %promo.code, id = promo.id, "Promo code created");
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/promocodes/edit
///
/// The code itself is the business key and stays as created.
pub async fn edit(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PromoCodePayload>,
) -> AppResult<Json<SuccessBody>> {
    let id = edit_id(payload.id.as_ref())?;
    let valid_until = check_valid_until(required_text(payload.valid_until, "validUntil")?)?;
    let discount_percent = check_discount(required(payload.discount_percent, "discountPercent")?)?;
    let id = id.ok_or_else(gone)?;

    if promo_repo::update(&state.pool, id, &valid_until, discount_percent, now_millis()).await?
        == 0
    {
        return Err(gone());
    }

    tracing::info!(id, "Promo code updated");
    Ok(Json(SuccessBody::ok()))
}

/// GET|DELETE /api/promocodes/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    if raw_id.trim().is_empty() {
        return Err(AppError::required("id parameter is missing"));
    }
    let id = parse_id(&raw_id).ok_or_else(gone)?;

    if !promo_repo::delete(&state.pool, id).await? {
        return Err(gone());
    }

    tracing::info!(id, "Promo code deleted");
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PromoCodeFetch {
    One(PromoCode),
    All(Vec<PromoCode>),
}

/// GET /api/promocodes/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<PromoCodeFetch>> {
    let Some(id) = query.id("Promocode")? else {
        return Ok(Json(PromoCodeFetch::All(
            promo_repo::find_all(&state.pool).await?,
        )));
    };
    let promo = promo_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Promocode does not exist"))?;
    Ok(Json(PromoCodeFetch::One(promo)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_until_formats() {
        assert!(check_valid_until("2026-12-31T23:59".into()).is_ok());
        assert!(check_valid_until("2026-12-31".into()).is_ok());
        assert!(check_valid_until("2026-12-31T23:59:00Z".into()).is_ok());
        assert!(check_valid_until("next friday".into()).is_err());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(check_discount(1).is_ok());
        assert!(check_discount(100).is_ok());
        assert_eq!(
            check_discount(0).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(check_discount(101).is_err());
    }
}
