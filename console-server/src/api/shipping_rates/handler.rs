//! Shipping Rate API Handlers

use axum::Json;
use axum::extract::{Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode, SuccessBody};
use shared::models::ShippingRate;
use shared::util::{now_millis, snowflake_id};

use crate::api::extract::{FetchQuery, JsonBody, edit_id, required, required_text};
use crate::db::repository::shipping_rate as shipping_repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRatePayload {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    pub name: Option<String>,
    pub minimum_delivery_days: Option<i64>,
    #[serde(default)]
    pub maximum_delivery_days: Option<i64>,
    pub rate: Option<f64>,
}

#[derive(Debug, PartialEq)]
struct ShippingFields {
    name: String,
    minimum_delivery_days: i64,
    maximum_delivery_days: Option<i64>,
    rate: f64,
}

fn out_of_range(msg: &str) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, msg)
}

impl ShippingRatePayload {
    fn fields(self) -> AppResult<ShippingFields> {
        let name = required_text(self.name, "name")?;
        let minimum = required(self.minimum_delivery_days, "minimumDeliveryDays")?;
        let rate = required(self.rate, "rate")?;

        if minimum <= 0 {
            return Err(out_of_range("minimumDeliveryDays must be greater than 0"));
        }
        // 0 clears the upper bound
        let maximum = self.maximum_delivery_days.filter(|days| *days != 0);
        if maximum.is_some_and(|days| days < minimum) {
            return Err(out_of_range(
                "maximumDeliveryDays cannot be less than minimumDeliveryDays",
            ));
        }
        if !(0.0..=100.0).contains(&rate) {
            return Err(out_of_range("rate must be between 0 and 100"));
        }

        Ok(ShippingFields {
            name,
            minimum_delivery_days: minimum,
            maximum_delivery_days: maximum,
            rate,
        })
    }
}

fn gone() -> AppError {
    AppError::no_longer_exists("ShippingRate no longer exists")
}

/// POST /api/shippingRates/save
pub async fn save(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ShippingRatePayload>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let fields = payload.fields()?;

    if shipping_repo::find_by_name(&state.pool, &fields.name)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("ShippingRate already exists"));
    }

    let now = now_millis();
    let shipping = ShippingRate {
        id: snowflake_id(),
        name: fields.name,
        minimum_delivery_days: fields.minimum_delivery_days,
        maximum_delivery_days: fields.maximum_delivery_days,
        rate: fields.rate,
        created: now,
        updated: now,
    };
    shipping_repo::insert(&state.pool, &shipping).await?;

    tracing::info!(shipping_rate = %shipping.name, id = shipping.id, "Shipping rate created");
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/shippingRates/edit
pub async fn edit(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ShippingRatePayload>,
) -> AppResult<Json<SuccessBody>> {
    let id = edit_id(payload.id.as_ref())?.ok_or_else(gone)?;
    let fields = payload.fields()?;

    let current = shipping_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(gone)?;
    if fields.name != current.name
        && shipping_repo::find_by_name(&state.pool, &fields.name)
            .await?
            .is_some_and(|other| other.id != id)
    {
        return Err(AppError::already_exists("ShippingRate already exists"));
    }

    let shipping = ShippingRate {
        name: fields.name,
        minimum_delivery_days: fields.minimum_delivery_days,
        maximum_delivery_days: fields.maximum_delivery_days,
        rate: fields.rate,
        updated: now_millis(),
        ..current
    };
    if shipping_repo::update(&state.pool, &shipping).await? == 0 {
        return Err(gone());
    }

    tracing::info!(shipping_rate = %shipping.name, id, "Shipping rate updated");
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShippingRateFetch {
    One(ShippingRate),
    All(Vec<ShippingRate>),
}

/// GET /api/shippingRates/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<ShippingRateFetch>> {
    let Some(id) = query.id("ShippingRate")? else {
        return Ok(Json(ShippingRateFetch::All(
            shipping_repo::find_all(&state.pool).await?,
        )));
    };
    let shipping = shipping_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ShippingRate does not exist"))?;
    Ok(Json(ShippingRateFetch::One(shipping)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(max: Option<i64>) -> ShippingRatePayload {
        ShippingRatePayload {
            id: None,
            name: Some("Standard".into()),
            minimum_delivery_days: Some(2),
            maximum_delivery_days: max,
            rate: Some(5.0),
        }
    }

    #[test]
    fn test_zero_maximum_clears_the_bound() {
        assert_eq!(payload(Some(0)).fields().unwrap().maximum_delivery_days, None);
        assert_eq!(payload(None).fields().unwrap().maximum_delivery_days, None);
        assert_eq!(payload(Some(5)).fields().unwrap().maximum_delivery_days, Some(5));
    }

    #[test]
    fn test_maximum_below_minimum_is_rejected() {
        let err = payload(Some(1)).fields().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_missing_name() {
        let mut p = payload(None);
        p.name = Some("  ".into());
        assert_eq!(p.fields().unwrap_err().message, "name key is missing");
    }
}
