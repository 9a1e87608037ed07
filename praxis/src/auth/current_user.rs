//! Request extractors for the authenticated user and their tenant scope.

use crate::AppState;
use crate::auth::session::verify_session_token;
use crate::db::handlers::{Organizations, Users};
use crate::errors::{Error, Result};
use crate::types::{OrganizationId, UserId};
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated user, verified from the session cookie.
///
/// The user row is re-fetched on every request so deleted accounts lose
/// access immediately, stale display names notwithstanding.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
}

/// Per-request tenancy context: the user plus their organization.
///
/// Business-data handlers take this extractor instead of [`CurrentUser`],
/// which makes the tenant scope an explicit parameter on every data-access
/// path. If the user has no membership yet, an organization is created for
/// them inside a transaction.
#[derive(Debug, Clone)]
pub struct OrgContext {
    pub user: CurrentUser,
    pub organization_id: OrganizationId,
}

/// Pull a named cookie out of the Cookie header.
fn extract_cookie(parts: &Parts, name: &str) -> Option<String> {
    let header = parts.headers.get(axum::http::header::COOKIE)?;
    let cookies = header.to_str().ok()?;
    for pair in cookies.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=')
            && key == name
        {
            return Some(value.to_string());
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let cookie_name = &state.config.auth.session.cookie_name;
        let token = extract_cookie(parts, cookie_name)
            .ok_or_else(|| Error::Unauthenticated("no session cookie".to_string()))?;

        let claims = verify_session_token(&token, &state.config.auth.jwt_secret)?;

        let mut conn = state
            .db
            .acquire()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        let user = Users::new(&mut conn)
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthenticated("session user no longer exists".to_string()))?;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        })
    }
}

impl FromRequestParts<AppState> for OrgContext {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        let mut tx = state
            .db
            .begin()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        let organization_id = Organizations::new(&mut tx)
            .resolve_for_user(user.id, &user.display_name)
            .await?;
        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(OrgContext {
            user,
            organization_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(value: &str) -> Parts {
        let req = Request::builder()
            .header("cookie", value)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    #[test]
    fn test_extract_cookie() {
        let parts = parts_with_cookie("praxis_session=abc123; other=x");
        assert_eq!(
            extract_cookie(&parts, "praxis_session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&parts, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_with_whitespace() {
        let parts = parts_with_cookie("a=1;  praxis_session=tok ;b=2");
        assert_eq!(
            extract_cookie(&parts, "praxis_session"),
            Some("tok".to_string())
        );
    }

    #[test]
    fn test_no_cookie_header() {
        let req = Request::builder().body(()).unwrap();
        let (parts, _) = req.into_parts();
        assert_eq!(extract_cookie(&parts, "praxis_session"), None);
    }
}
