//! Emailed link handlers
//!
//! The token or email arrives either as the last path segment or as a query
//! parameter; both forms share one implementation.

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode, SuccessBody};
use shared::util::now_millis;

use crate::auth::LinkPurpose;
use crate::auth::links::send_reset_link;
use crate::auth::tokens::verify_link_token;
use crate::db::repository::admin as admin_repo;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    pub token: Option<String>,
    pub email: Option<String>,
}

/// GET /api/confirm/email/{token}
pub async fn confirm_email_path(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    confirm_email(&state, Some(token)).await
}

/// GET /api/confirm/email?token=
pub async fn confirm_email_query(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> AppResult<Json<SuccessBody>> {
    confirm_email(&state, query.token).await
}

async fn confirm_email(state: &AppState, token: Option<String>) -> AppResult<Json<SuccessBody>> {
    let token = token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::not_found("Invalid Link"))?;

    let claims = verify_link_token(token.trim(), LinkPurpose::Email, &state.config.jwt_secret)?;
    let admin = admin_repo::find_by_email(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;
    if admin.email_verified {
        return Err(AppError::new(ErrorCode::LinkAlreadyUsed));
    }

    admin_repo::mark_email_verified(&state.pool, admin.id, now_millis()).await?;
    tracing::info!(email = %admin.email, "Email confirmed");
    Ok(Json(SuccessBody::ok()))
}

/// GET /api/confirm/resetpassword/{email}
pub async fn reset_password_path(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    request_reset(&state, Some(email)).await
}

/// GET /api/confirm/resetpassword?email=
pub async fn reset_password_query(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    request_reset(&state, query.email).await
}

async fn request_reset(
    state: &AppState,
    email: Option<String>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::required("Email is missing"))?;

    let admin = admin_repo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::not_found("That email does not seem to exist"))?;

    send_reset_link(state, &admin.email, &admin.name).await?;
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}
