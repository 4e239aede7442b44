//! Auth API Handlers
//!
//! POST /api/auth/signup          create an unverified admin, mail a confirmation link
//! POST /api/auth/login           verify credentials, set the session cookie
//! POST /api/auth/logout          clear the session cookie
//! GET  /api/auth/session         signed-in admin profile
//! POST /api/auth/changepassword  consume a reset link

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use http::StatusCode;
use http::header::SET_COOKIE;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode, SuccessBody};
use shared::models::AdminProfile;
use shared::util::{now_millis, snowflake_id};
use validator::Validate;

use crate::api::extract::JsonBody;
use crate::auth::links::send_verification_link;
use crate::auth::password::{check_password_length, hash_password, verify_password};
use crate::auth::session::{clear_session_cookie, create_session_token, session_cookie};
use crate::auth::tokens::verify_link_token;
use crate::auth::{AdminIdentity, LinkPurpose};
use crate::catalog::run_in_transaction;
use crate::db::repository::{admin as admin_repo, token_blacklist};
use crate::db::repository::admin::Admin;
use crate::state::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Validate)]
struct EmailAddress {
    #[validate(email)]
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: AdminProfile,
}

// ── Helpers ──

impl Credentials {
    /// Trimmed, lowercased email and the raw password
    fn require(self) -> AppResult<(String, String)> {
        let email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::required("Email is missing"))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::required("Password is missing"))?;
        Ok((email, password))
    }
}

/// Display name: the local part with its first `.` turned into a space
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local.replacen('.', " ", 1)
}

// ── Handlers ──

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<Credentials>,
) -> AppResult<(StatusCode, Json<SuccessBody>)> {
    let (email, password) = req.require()?;
    let address = EmailAddress { email };
    address
        .validate()
        .map_err(|_| AppError::validation("Please enter a valid email"))?;
    let email = address.email;

    if admin_repo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::already_exists("Admin already exists"));
    }
    check_password_length(&password)?;

    let now = now_millis();
    let admin = Admin {
        id: snowflake_id(),
        name: name_from_email(&email),
        email,
        password: hash_password(&password)?,
        image: String::new(),
        email_verified: false,
        created: now,
        updated: now,
    };
    admin_repo::insert(&state.pool, &admin).await?;
    tracing::info!(email = %admin.email, id = admin.id, "Admin signed up");

    send_verification_link(&state, &admin.email, &admin.name).await?;
    Ok((StatusCode::CREATED, Json(SuccessBody::ok())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<Credentials>,
) -> AppResult<impl IntoResponse> {
    let (email, password) = req.require()?;

    let admin = admin_repo::find_by_email(&state.pool, &email)
        .await?
        .filter(|admin| verify_password(&password, &admin.password))
        .ok_or_else(AppError::invalid_credentials)?;

    if !admin.email_verified {
        send_verification_link(&state, &admin.email, &admin.name).await?;
        return Err(AppError::with_message(
            ErrorCode::EmailNotVerified,
            "Confirmation email sent. Please confirm your email to login",
        ));
    }

    let config = &state.config;
    let token = create_session_token(
        admin.id,
        &admin.email,
        &config.jwt_secret,
        config.session_ttl_hours,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Session token could not be signed");
        AppError::internal("Internal error")
    })?;
    let cookie = session_cookie(
        &config.session_cookie_name,
        &token,
        config.session_ttl_hours,
        config.is_production(),
    );

    tracing::info!(email = %admin.email, id = admin.id, "Admin logged in");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            admin: admin.profile(),
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(&state.config.session_cookie_name))],
        Json(SuccessBody::ok()),
    )
}

/// GET /api/auth/session
pub async fn session(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> AppResult<Json<AdminProfile>> {
    let admin = admin_repo::find_by_id(&state.pool, identity.admin_id)
        .await?
        .ok_or_else(AppError::not_authenticated)?;
    Ok(Json(admin.profile()))
}

/// POST /api/auth/changepassword
///
/// A reset link works once: its `jti` is blacklisted with the password update.
pub async fn change_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<SuccessBody>> {
    let token = req
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::required("Password is missing"))?;

    let claims = verify_link_token(&token, LinkPurpose::Reset, &state.config.jwt_secret)?;
    if token_blacklist::contains(&state.pool, &claims.jti).await? {
        return Err(AppError::new(ErrorCode::LinkAlreadyUsed));
    }
    check_password_length(&password)?;

    let admin = admin_repo::find_by_email(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;
    let hash = hash_password(&password)?;
    let jti = claims.jti;
    let admin_id = admin.id;

    run_in_transaction(&state.pool, "change_password", move |conn| {
        Box::pin(async move {
            let now = now_millis();
            if !token_blacklist::insert(&mut *conn, &jti, now).await? {
                return Err(AppError::new(ErrorCode::LinkAlreadyUsed).into());
            }
            admin_repo::update_password(&mut *conn, admin_id, &hash, now).await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(email = %admin.email, "Password changed");
    Ok(Json(SuccessBody::ok()))
}
