//! Emailed account links

use crate::auth::tokens::{LinkPurpose, issue_link_token};
use crate::email::{password_reset_email, verification_email};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

fn link(state: &AppState, page: &str, token: &str) -> String {
    format!("{}/pages/{page}/?token={token}", state.config.app_base_url)
}

/// Mail a fresh email-confirmation link
pub async fn send_verification_link(state: &AppState, email: &str, name: &str) -> ServiceResult<()> {
    let token = issue_link_token(email, LinkPurpose::Email, &state.config.jwt_secret)?;
    let link = link(state, "confirm/email", &token);
    state
        .mailer
        .send(verification_email(email, name, &link))
        .await
        .map_err(ServiceError::from)?;
    tracing::info!(email = %email, "Confirmation link sent");
    Ok(())
}

/// Mail a password reset link
pub async fn send_reset_link(state: &AppState, email: &str, name: &str) -> ServiceResult<()> {
    let token = issue_link_token(email, LinkPurpose::Reset, &state.config.jwt_secret)?;
    let link = link(state, "auth/changepassword", &token);
    state
        .mailer
        .send(password_reset_email(email, name, &link))
        .await
        .map_err(ServiceError::from)?;
    tracing::info!(email = %email, "Password reset link sent");
    Ok(())
}
