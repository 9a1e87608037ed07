//! Shared helpers for integration tests.

use crate::{AppState, Config, build_router};
use axum::http::StatusCode;
use axum_test::{TestServer, TestServerBuilder};
use sqlx::PgPool;

/// Password used by every account [`signup`] creates.
pub const TEST_PASSWORD: &str = "correct horse battery";

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
    // TestServer speaks plain HTTP
    config.auth.session.cookie_secure = false;
    config
}

/// Build a `TestServer` over the full router, with cookie persistence so a
/// register/login response authenticates subsequent requests.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let state = AppState::builder()
        .db(pool)
        .config(create_test_config())
        .build();
    let router = build_router(&state).expect("Failed to build router");

    let config = TestServerBuilder::new().save_cookies().into_config();
    TestServer::new_with_config(router, config).expect("Failed to create test server")
}

/// Register an account (password [`TEST_PASSWORD`]) and return the
/// authenticated `GET /api/auth/user` body, which includes the resolved
/// `organization_id`.
pub async fn signup(server: &TestServer, email: &str) -> serde_json::Value {
    let display_name = email.split('@').next().unwrap_or("user");
    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": display_name,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    server.get("/api/auth/user").await.json()
}
