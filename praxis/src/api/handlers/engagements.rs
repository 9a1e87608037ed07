//! Handlers for `/api/engagements`.

use crate::AppState;
use crate::api::models::engagements::{
    EngagementCreate, EngagementResponse, EngagementUpdate, ListEngagementsQuery,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Engagements, ScopedRepository, engagements::EngagementFilter};
use crate::errors::{Error, Result};
use crate::types::EngagementId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/engagements",
    params(ListEngagementsQuery),
    responses(
        (status = 200, description = "Engagements in the caller's organization", body = Vec<EngagementResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "engagements"
)]
#[tracing::instrument(skip_all)]
pub async fn list_engagements(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListEngagementsQuery>,
) -> Result<Json<Vec<EngagementResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = EngagementFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let engagements = Engagements::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(engagements.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/engagements",
    request_body = EngagementCreate,
    responses(
        (status = 201, description = "Engagement created", body = EngagementResponse),
        (status = 404, description = "Referenced client or contract not found in the caller's organization"),
    ),
    tag = "engagements"
)]
#[tracing::instrument(skip_all)]
pub async fn create_engagement(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<EngagementCreate>,
) -> Result<(StatusCode, Json<EngagementResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let engagement = Engagements::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(engagement.into())))
}

#[utoipa::path(
    get,
    path = "/engagements/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Engagement", body = EngagementResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "engagements"
)]
#[tracing::instrument(skip_all)]
pub async fn get_engagement(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<EngagementId>,
) -> Result<Json<EngagementResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let engagement = Engagements::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("engagement", id))?;
    Ok(Json(engagement.into()))
}

#[utoipa::path(
    patch,
    path = "/engagements/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = EngagementUpdate,
    responses(
        (status = 200, description = "Engagement updated", body = EngagementResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "engagements"
)]
#[tracing::instrument(skip_all)]
pub async fn update_engagement(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<EngagementId>,
    Json(request): Json<EngagementUpdate>,
) -> Result<Json<EngagementResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let engagement = Engagements::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("engagement", id),
            other => Error::Database(other),
        })?;
    Ok(Json(engagement.into()))
}

#[utoipa::path(
    delete,
    path = "/engagements/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Engagement deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "engagements"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_engagement(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<EngagementId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Engagements::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("engagement", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_engagement_for_client(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "delivery@example.com").await;

        let client = server
            .post("/api/clients")
            .json(&json!({ "name": "Initech" }))
            .await
            .json::<serde_json::Value>();

        let created = server
            .post("/api/engagements")
            .json(&json!({ "name": "TPS modernization", "client_id": client["id"] }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let engagement: serde_json::Value = created.json();
        assert_eq!(engagement["status"], "active");

        let id = engagement["id"].as_str().unwrap();
        let updated = server
            .patch(&format!("/api/engagements/{id}"))
            .json(&json!({ "status": "completed" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<serde_json::Value>()["status"], "completed");
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_engagement_hidden(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "a@example.com").await;
        let engagement = server
            .post("/api/engagements")
            .json(&json!({ "name": "Private" }))
            .await
            .json::<serde_json::Value>();
        let id = engagement["id"].as_str().unwrap().to_string();

        server.clear_cookies();
        signup(&server, "b@example.com").await;
        server
            .get(&format!("/api/engagements/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
