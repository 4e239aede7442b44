//! Product API Handlers

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Multipart, Query, State};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, AppResult, SuccessBody};
use shared::models::Product;

use crate::api::extract::{FetchQuery, FormData};
use crate::db::repository::product as product_repo;
use crate::services::{self, ProductDraft};
use crate::state::AppState;

fn draft_from(form: FormData) -> AppResult<ProductDraft> {
    let properties: BTreeMap<String, String> = form.json("currentProperties")?;
    Ok(ProductDraft {
        name: form.non_empty("productName")?.to_string(),
        brand: form.non_empty("productBrand")?.to_string(),
        description: form.non_empty("productDescription")?.to_string(),
        contents: form.non_empty("productContents")?.to_string(),
        price: form.number("productPrice")?,
        currency: form.non_empty("currency")?.to_string(),
        category: form.non_empty("categoryName")?.to_string(),
        properties,
        discount: form.number("discount")?,
        stock: form.number("stock")?,
        images: form.files,
    })
}

/// POST /api/products/save
pub async fn save(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let form = FormData::from_multipart(multipart).await?;
    let draft = draft_from(form)?;
    services::create_product(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/products/edit
pub async fn edit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let form = FormData::from_multipart(multipart).await?;
    let id = form.id(&["productId", "_id"])?;
    let draft = draft_from(form)?;
    let id = id.ok_or_else(|| {
        AppError::no_longer_exists(format!("Product {} no longer exists", draft.name))
    })?;

    services::edit_product(&state, id, draft).await?;
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProductFetch {
    One(Product),
    All(Vec<Product>),
}

/// GET /api/products/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<ProductFetch>> {
    let Some(id) = query.id("Product")? else {
        let products = product_repo::find_all(&state.pool).await?;
        return Ok(Json(ProductFetch::All(products)));
    };

    let product = product_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product does not exist"))?;
    Ok(Json(ProductFetch::One(product)))
}
