//! JWT session tokens.
//!
//! Sessions are stateless: a signed JWT carried in an HttpOnly cookie. The
//! claims identify the user; the organization is resolved per request from
//! the membership table, never baked into the token.

use crate::config::SessionConfig;
use crate::errors::{Error, Result};
use crate::types::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: UserId,
    pub email: String,
    pub display_name: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    pub iat: i64,
}

/// Create a signed session token for a user.
pub fn create_session_token(
    user_id: UserId,
    email: &str,
    display_name: &str,
    secret: &str,
    lifetime: std::time::Duration,
) -> Result<String> {
    let now = Utc::now();
    let lifetime = Duration::from_std(lifetime)
        .map_err(|e| Error::Internal(format!("session lifetime out of range: {e}")))?;
    let claims = SessionClaims {
        sub: user_id,
        email: email.to_string(),
        display_name: display_name.to_string(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("failed to sign session token: {e}")))
}

/// Verify a session token and return its claims.
///
/// Client-side problems (expired, tampered, garbage) map to
/// [`Error::Unauthenticated`]; anything else is an internal error.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims> {
    match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => {
                Err(Error::Unauthenticated("session expired".to_string()))
            }
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => {
                Err(Error::Unauthenticated("invalid session token".to_string()))
            }
            _ => Err(Error::Internal(format!(
                "session token verification failed: {e}"
            ))),
        },
    }
}

/// Build the Set-Cookie value that carries a session token.
pub fn create_session_cookie(token: &str, session: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
        session.cookie_name,
        token,
        session.cookie_same_site,
        session.timeout.as_secs()
    );
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie(session: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite={}; Max-Age=0",
        session.cookie_name, session.cookie_same_site
    );
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn make_token(lifetime: std::time::Duration) -> (UserId, String) {
        let user_id = Uuid::new_v4();
        let token =
            create_session_token(user_id, "alice@example.com", "Alice", SECRET, lifetime).unwrap();
        (user_id, token)
    }

    #[test]
    fn test_roundtrip() {
        let (user_id, token) = make_token(std::time::Duration::from_secs(3600));
        let claims = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.display_name, "Alice");
    }

    #[test]
    fn test_wrong_secret_is_unauthenticated() {
        let (_, token) = make_token(std::time::Duration::from_secs(3600));
        let err = verify_session_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, Error::Unauthenticated(_)));
    }

    #[test]
    fn test_garbage_token_is_unauthenticated() {
        let err = verify_session_token("not.a.jwt", SECRET).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated(_)));
    }

    #[test]
    fn test_cookie_format() {
        let session = SessionConfig::default();
        let cookie = create_session_cookie("tok123", &session);
        assert!(cookie.starts_with("praxis_session=tok123; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.ends_with("; Secure"));

        let mut insecure = session.clone();
        insecure.cookie_secure = false;
        assert!(!create_session_cookie("tok123", &insecure).contains("Secure"));

        let clear = clear_session_cookie(&session);
        assert!(clear.contains("Max-Age=0"));
    }
}
