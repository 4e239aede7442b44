//! Image API Handlers

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, AppResult, SuccessBody};
use shared::models::ImageRef;

use crate::api::extract::{JsonBody, doc_id};
use crate::services;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImagesRequest {
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// POST /api/image/delete
pub async fn delete_one(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteImageRequest>,
) -> AppResult<Json<SuccessBody>> {
    let raw_id = req
        .id
        .filter(|id| !id.is_null())
        .ok_or_else(|| AppError::required("Id is missing"))?;
    let image = req
        .image
        .filter(|image| !image.key.is_empty())
        .ok_or_else(|| AppError::required("Image to delete is missing"))?;
    let owner_id = doc_id(&raw_id)
        .ok_or_else(|| AppError::not_found(format!("Image owner {raw_id} does not exist")))?;

    services::delete_image(&state, owner_id, &image.key).await?;
    Ok(Json(SuccessBody::ok()))
}

/// POST /api/images/delete
pub async fn delete_many(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteImagesRequest>,
) -> AppResult<Json<SuccessBody>> {
    services::delete_images(&state, &req.images).await?;
    Ok(Json(SuccessBody::ok()))
}
