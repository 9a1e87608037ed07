//! Handlers for `/api/projects`.

use crate::AppState;
use crate::api::models::projects::{
    ListProjectsQuery, ProjectCreate, ProjectResponse, ProjectUpdate,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Projects, ScopedRepository, projects::ProjectFilter};
use crate::errors::{Error, Result};
use crate::types::ProjectId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "Projects in the caller's organization", body = Vec<ProjectResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "projects"
)]
#[tracing::instrument(skip_all)]
pub async fn list_projects(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ProjectFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let projects = Projects::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = ProjectCreate,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 404, description = "Referenced engagement or client not found in the caller's organization"),
    ),
    tag = "projects"
)]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ProjectCreate>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let project = Projects::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "projects"
)]
#[tracing::instrument(skip_all)]
pub async fn get_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let project = Projects::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("project", id))?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    patch,
    path = "/projects/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = ProjectUpdate,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "projects"
)]
#[tracing::instrument(skip_all)]
pub async fn update_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProjectId>,
    Json(request): Json<ProjectUpdate>,
) -> Result<Json<ProjectResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let project = Projects::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("project", id),
            other => Error::Database(other),
        })?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "projects"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Projects::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("project", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_project_under_engagement(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "pm@example.com").await;

        let engagement = server
            .post("/api/engagements")
            .json(&json!({ "name": "Rollout" }))
            .await
            .json::<serde_json::Value>();

        let created = server
            .post("/api/projects")
            .json(&json!({ "name": "Phase 1", "engagement_id": engagement["id"] }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let project: serde_json::Value = created.json();
        assert_eq!(project["status"], "planned");

        let id = project["id"].as_str().unwrap();
        let updated = server
            .patch(&format!("/api/projects/{id}"))
            .json(&json!({ "status": "in_progress" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<serde_json::Value>()["status"], "in_progress");
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_engagement_reference_is_404(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "one@example.com").await;
        let engagement = server
            .post("/api/engagements")
            .json(&json!({ "name": "Theirs" }))
            .await
            .json::<serde_json::Value>();

        server.clear_cookies();
        signup(&server, "two@example.com").await;
        let response = server
            .post("/api/projects")
            .json(&json!({ "name": "Squatter", "engagement_id": engagement["id"] }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
