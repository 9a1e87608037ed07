//! Handlers for `/api/threads` and nested messages.

use crate::AppState;
use crate::api::models::threads::{
    ListThreadsQuery, MessageCreate, MessageResponse, ThreadCreate, ThreadResponse,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Messages, Threads, messages::ThreadFilter};
use crate::errors::{Error, Result};
use crate::types::ThreadId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/threads",
    params(ListThreadsQuery),
    responses(
        (status = 200, description = "Threads in the caller's organization, most recently active first", body = Vec<ThreadResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "threads"
)]
#[tracing::instrument(skip_all)]
pub async fn list_threads(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListThreadsQuery>,
) -> Result<Json<Vec<ThreadResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ThreadFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
    };
    let threads = Threads::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/threads",
    request_body = ThreadCreate,
    responses(
        (status = 201, description = "Thread created", body = ThreadResponse),
        (status = 404, description = "Referenced client not found in the caller's organization"),
    ),
    tag = "threads"
)]
#[tracing::instrument(skip_all)]
pub async fn create_thread(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ThreadCreate>,
) -> Result<(StatusCode, Json<ThreadResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let thread = Threads::new(&mut conn)
        .create(ctx.organization_id, ctx.user.id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(thread.into())))
}

#[utoipa::path(
    get,
    path = "/threads/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Thread", body = ThreadResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "threads"
)]
#[tracing::instrument(skip_all)]
pub async fn get_thread(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ThreadId>,
) -> Result<Json<ThreadResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let thread = Threads::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("thread", id))?;
    Ok(Json(thread.into()))
}

#[utoipa::path(
    get,
    path = "/threads/{id}/messages",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Messages in the thread, oldest first", body = Vec<MessageResponse>),
        (status = 404, description = "Thread not found in the caller's organization"),
    ),
    tag = "threads"
)]
#[tracing::instrument(skip_all)]
pub async fn list_messages(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ThreadId>,
) -> Result<Json<Vec<MessageResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let messages = Messages::new(&mut conn)
        .list_for_thread(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("thread", id),
            other => Error::Database(other),
        })?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/threads/{id}/messages",
    params(("id" = String, Path, format = "uuid")),
    request_body = MessageCreate,
    responses(
        (status = 201, description = "Message appended", body = MessageResponse),
        (status = 404, description = "Thread not found in the caller's organization"),
    ),
    tag = "threads"
)]
#[tracing::instrument(skip_all)]
pub async fn create_message(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ThreadId>,
    Json(request): Json<MessageCreate>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if request.body.trim().is_empty() {
        return Err(Error::BadRequest("message body must not be empty".to_string()));
    }
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let message = Messages::new(&mut conn)
        .create(ctx.organization_id, id, ctx.user.id, &request.body)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("thread", id),
            other => Error::Database(other),
        })?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_thread_conversation(pool: PgPool) {
        let server = create_test_app(pool).await;
        let me = signup(&server, "talker@example.com").await;

        let created = server
            .post("/api/threads")
            .json(&json!({ "subject": "Kickoff" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let thread: serde_json::Value = created.json();
        assert_eq!(thread["created_by"], me["id"]);
        let id = thread["id"].as_str().unwrap();

        for body in ["Hello", "Agenda attached"] {
            server
                .post(&format!("/api/threads/{id}/messages"))
                .json(&json!({ "body": body }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let messages = server.get(&format!("/api/threads/{id}/messages")).await;
        messages.assert_status_ok();
        let listed: Vec<serde_json::Value> = messages.json();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["body"], "Hello");
    }

    #[test_log::test(sqlx::test)]
    async fn test_empty_message_rejected(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "quiet@example.com").await;

        let thread = server
            .post("/api/threads")
            .json(&json!({ "subject": "Silence" }))
            .await
            .json::<serde_json::Value>();
        let id = thread["id"].as_str().unwrap();

        let response = server
            .post(&format!("/api/threads/{id}/messages"))
            .json(&json!({ "body": "   " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_thread_is_masked(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "insider@example.com").await;
        let thread = server
            .post("/api/threads")
            .json(&json!({ "subject": "Internal" }))
            .await
            .json::<serde_json::Value>();
        let id = thread["id"].as_str().unwrap().to_string();

        server.clear_cookies();
        signup(&server, "eavesdropper@example.com").await;
        server
            .get(&format!("/api/threads/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/api/threads/{id}/messages"))
            .json(&json!({ "body": "anyone there?" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
