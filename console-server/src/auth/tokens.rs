//! Emailed link tokens
//!
//! One JWT per link, bound to a purpose and carrying a unique `jti` so a
//! reset link can be blacklisted once used.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};

/// Link lifetime
pub const LINK_EXPIRY_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPurpose {
    /// Confirm the email address of a new admin
    Email,
    /// Choose a new password
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkClaims {
    /// Admin email
    pub sub: String,
    pub purpose: LinkPurpose,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

impl LinkClaims {
    pub fn new(email: &str, purpose: LinkPurpose) -> Self {
        let now = chrono::Utc::now();
        Self {
            sub: email.to_string(),
            purpose,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: (now + chrono::Duration::hours(LINK_EXPIRY_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }
}

pub fn encode_link_token(claims: &LinkClaims, secret: &str) -> AppResult<String> {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Link token could not be signed");
        AppError::internal("Internal error")
    })
}

pub fn issue_link_token(email: &str, purpose: LinkPurpose, secret: &str) -> AppResult<String> {
    encode_link_token(&LinkClaims::new(email, purpose), secret)
}

/// Decode a link token and check it was issued for `purpose`
pub fn verify_link_token(token: &str, purpose: LinkPurpose, secret: &str) -> AppResult<LinkClaims> {
    let data = jsonwebtoken::decode::<LinkClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
        _ => {
            tracing::debug!("Link token rejected: {e}");
            AppError::new(ErrorCode::TokenInvalid)
        }
    })?;

    if data.claims.purpose != purpose {
        return Err(AppError::new(ErrorCode::TokenInvalid));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = issue_link_token("jane@shop.test", LinkPurpose::Email, SECRET).unwrap();
        let claims = verify_link_token(&token, LinkPurpose::Email, SECRET).unwrap();
        assert_eq!(claims.sub, "jane@shop.test");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_wrong_purpose_is_invalid() {
        let token = issue_link_token("jane@shop.test", LinkPurpose::Email, SECRET).unwrap();
        let err = verify_link_token(&token, LinkPurpose::Reset, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_link() {
        let mut claims = LinkClaims::new("jane@shop.test", LinkPurpose::Reset);
        claims.exp = (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as usize;
        let token = encode_link_token(&claims, SECRET).unwrap();

        let err = verify_link_token(&token, LinkPurpose::Reset, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
        assert_eq!(err.message, "Sorry. This link has already expired");
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = verify_link_token("not-a-token", LinkPurpose::Email, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
