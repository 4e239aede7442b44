//! Category API Handlers

use axum::Json;
use axum::extract::{Multipart, Query, State};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, AppResult, SuccessBody};
use shared::models::{Category, ParentCategory, Property};

use crate::api::extract::{FetchQuery, FormData};
use crate::db::repository::category as category_repo;
use crate::services::{self, CategoryDraft};
use crate::state::AppState;

fn draft_from(form: FormData) -> AppResult<CategoryDraft> {
    let name = form.non_empty("name")?.to_string();
    let parent: ParentCategory = form.json("parentCategory")?;
    let properties: Vec<Property> = form.json("properties")?;
    Ok(CategoryDraft {
        name,
        parent,
        properties,
        images: form.files,
    })
}

/// POST /api/categories/save
pub async fn save(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let form = FormData::from_multipart(multipart).await?;
    let draft = draft_from(form)?;
    services::create_category(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/categories/edit
pub async fn edit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<SuccessBody>> {
    let form = FormData::from_multipart(multipart).await?;
    let id = form.id(&["id", "_id"])?;
    let draft = draft_from(form)?;
    let id = id.ok_or_else(|| {
        AppError::no_longer_exists(format!("Category {} no longer exists", draft.name))
    })?;

    services::edit_category(&state, id, draft).await?;
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CategoryFetch {
    /// One category plus every other one, for the parent picker
    One {
        category: Category,
        categories: Vec<Category>,
    },
    All(Vec<Category>),
}

/// GET /api/categories/fetch[?id=]
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> AppResult<Json<CategoryFetch>> {
    let Some(id) = query.id("Category")? else {
        let categories = category_repo::find_all(&state.pool).await?;
        return Ok(Json(CategoryFetch::All(categories)));
    };

    let category = category_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category does not exist"))?;
    let categories = category_repo::find_all_except(&state.pool, id).await?;
    Ok(Json(CategoryFetch::One {
        category,
        categories,
    }))
}
