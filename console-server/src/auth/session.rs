//! Admin session JWT and the route guard

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// JWT claims for an admin session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin id
    pub sub: String,
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Signed-in admin, inserted into request extensions by [`require_admin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub email: String,
}

pub fn create_session_token(
    admin_id: i64,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(ttl_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_session_token(token: &str, secret: &str) -> Option<AdminIdentity> {
    let token_data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| tracing::debug!("Session token rejected: {e}"))
    .ok()?;

    Some(AdminIdentity {
        admin_id: token_data.claims.sub.parse().ok()?,
        email: token_data.claims.email,
    })
}

/// Session token from the console cookie, or from a Bearer header
fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    })
}

/// `Set-Cookie` value carrying a fresh session
pub fn session_cookie(name: &str, token: &str, ttl_hours: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl_hours * 3600
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that ends the session
pub fn clear_session_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Middleware that rejects requests without a valid admin session
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = session_token(request.headers(), &state.config.session_cookie_name)
        .and_then(|token| verify_session_token(token, &state.config.jwt_secret))
        .ok_or_else(AppError::not_authenticated)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_session_token_round_trip() {
        let token = create_session_token(42, "admin@shop.test", SECRET, 1).unwrap();
        let identity = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(identity.admin_id, 42);
        assert_eq!(identity.email, "admin@shop.test");
        assert!(verify_session_token(&token, "other-secret").is_none());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let token = create_session_token(42, "admin@shop.test", SECRET, -2).unwrap();
        assert!(verify_session_token(&token, SECRET).is_none());
    }

    #[test]
    fn test_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; console-admin-session=abc.def; x=1"),
        );
        assert_eq!(
            session_token(&headers, "console-admin-session"),
            Some("abc.def")
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers, "console-admin-session"), Some("xyz"));

        assert_eq!(session_token(&HeaderMap::new(), "console-admin-session"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("s", "tok", 24, true);
        assert_eq!(cookie, "s=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400; Secure");
        assert!(clear_session_cookie("s").ends_with("Max-Age=0"));
    }
}
