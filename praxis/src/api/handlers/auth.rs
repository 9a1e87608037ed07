//! Authentication endpoints: register, login, logout, current user.

use crate::AppState;
use crate::api::models::auth::{CurrentUserResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::auth::OrgContext;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{clear_session_cookie, create_session_cookie, create_session_token};
use crate::db::errors::DbError;
use crate::db::handlers::Users;
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

fn validate_password(state: &AppState, password: &str) -> Result<()> {
    let rules = &state.config.auth.password;
    if password.len() < rules.min_length {
        return Err(Error::BadRequest(format!(
            "password must be at least {} characters",
            rules.min_length
        )));
    }
    if password.len() > rules.max_length {
        return Err(Error::BadRequest(format!(
            "password must be at most {} characters",
            rules.max_length
        )));
    }
    Ok(())
}

fn session_response(
    state: &AppState,
    user: UserDBResponse,
    status: StatusCode,
) -> Result<impl IntoResponse + use<>> {
    let token = create_session_token(
        user.id,
        &user.email,
        &user.display_name,
        &state.config.auth.jwt_secret,
        state.config.auth.session.timeout,
    )?;
    let cookie = create_session_cookie(&token, &state.config.auth.session);
    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// Create an account and start a session.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if !request.email.contains('@') {
        return Err(Error::BadRequest("invalid email address".to_string()));
    }
    validate_password(&state, &request.password)?;

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Internal(format!("hashing task failed: {e}")))??;

    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            email: request.email.trim().to_lowercase(),
            password_hash,
            display_name: request.display_name,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation(_) => {
                Error::Conflict("email is already registered".to_string())
            }
            other => Error::Database(other),
        })?;

    session_response(&state, user, StatusCode::CREATED)
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = UserResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .get_by_email(&request.email.trim().to_lowercase())
        .await?
        .ok_or_else(|| Error::Unauthenticated("invalid credentials".to_string()))?;

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| Error::Internal(format!("verification task failed: {e}")))??;
    if !valid {
        return Err(Error::Unauthenticated("invalid credentials".to_string()));
    }

    session_response(&state, user, StatusCode::OK)
}

/// End the session by expiring the cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session ended")),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(&state.config.auth.session);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "logged out" })),
    )
}

/// The authenticated user's profile and resolved organization.
#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn current_user(ctx: OrgContext) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        id: ctx.user.id,
        email: ctx.user.email,
        display_name: ctx.user.display_name,
        organization_id: ctx.organization_id,
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_register_starts_session(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "new@example.com",
                "password": "a long enough password",
                "display_name": "Newcomer"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        // the Set-Cookie from register authenticates subsequent requests
        let me = server.get("/api/auth/user").await;
        me.assert_status_ok();
        let body: serde_json::Value = me.json();
        assert_eq!(body["email"], "new@example.com");
        assert!(body["organization_id"].is_string());
    }

    #[test_log::test(sqlx::test)]
    async fn test_duplicate_registration_conflicts(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "dup@example.com").await;

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "dup@example.com",
                "password": "another password",
                "display_name": "Other"
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[test_log::test(sqlx::test)]
    async fn test_short_password_rejected(pool: PgPool) {
        let server = create_test_app(pool).await;
        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "short@example.com",
                "password": "short",
                "display_name": "S"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[test_log::test(sqlx::test)]
    async fn test_login_and_bad_credentials(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "login@example.com").await;
        server.clear_cookies();

        let bad = server
            .post("/api/auth/login")
            .json(&json!({ "email": "login@example.com", "password": "wrong password" }))
            .await;
        bad.assert_status(StatusCode::UNAUTHORIZED);

        let good = server
            .post("/api/auth/login")
            .json(&json!({ "email": "login@example.com", "password": "correct horse battery" }))
            .await;
        good.assert_status_ok();

        let me = server.get("/api/auth/user").await;
        me.assert_status_ok();
    }

    #[test_log::test(sqlx::test)]
    async fn test_logout_clears_session(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "bye@example.com").await;

        server.get("/api/auth/user").await.assert_status_ok();
        server.post("/api/auth/logout").await.assert_status_ok();
        // the clearing cookie overwrote the session
        let me = server.get("/api/auth/user").await;
        me.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test_log::test(sqlx::test)]
    async fn test_unauthenticated_requests_rejected(pool: PgPool) {
        let server = create_test_app(pool).await;
        for path in ["/api/auth/user", "/api/clients", "/api/invoices"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
        }
    }
}
