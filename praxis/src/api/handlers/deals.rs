//! Handlers for `/api/deals`.

use crate::AppState;
use crate::api::models::deals::{DealCreate, DealResponse, DealUpdate, ListDealsQuery};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Deals, ScopedRepository, deals::DealFilter};
use crate::errors::{Error, Result};
use crate::types::DealId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/deals",
    params(ListDealsQuery),
    responses(
        (status = 200, description = "Deals in the caller's organization", body = Vec<DealResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "deals"
)]
#[tracing::instrument(skip_all)]
pub async fn list_deals(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListDealsQuery>,
) -> Result<Json<Vec<DealResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = DealFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let deals = Deals::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(deals.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/deals",
    request_body = DealCreate,
    responses(
        (status = 201, description = "Deal created", body = DealResponse),
        (status = 404, description = "Referenced client not found in the caller's organization"),
    ),
    tag = "deals"
)]
#[tracing::instrument(skip_all)]
pub async fn create_deal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<DealCreate>,
) -> Result<(StatusCode, Json<DealResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deal = Deals::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(deal.into())))
}

#[utoipa::path(
    get,
    path = "/deals/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Deal", body = DealResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "deals"
)]
#[tracing::instrument(skip_all)]
pub async fn get_deal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DealId>,
) -> Result<Json<DealResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deal = Deals::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("deal", id))?;
    Ok(Json(deal.into()))
}

#[utoipa::path(
    patch,
    path = "/deals/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = DealUpdate,
    responses(
        (status = 200, description = "Deal updated", body = DealResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "deals"
)]
#[tracing::instrument(skip_all)]
pub async fn update_deal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DealId>,
    Json(request): Json<DealUpdate>,
) -> Result<Json<DealResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deal = Deals::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("deal", id),
            other => Error::Database(other),
        })?;
    Ok(Json(deal.into()))
}

#[utoipa::path(
    delete,
    path = "/deals/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Deal deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "deals"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_deal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<DealId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Deals::new(&mut conn).delete(ctx.organization_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("deal", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_stage_defaults_and_updates(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "deals@example.com").await;

        let created = server
            .post("/api/deals")
            .json(&json!({ "title": "Platform migration", "value": "125000.00" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let deal: serde_json::Value = created.json();
        assert_eq!(deal["stage"], "lead");

        let id = deal["id"].as_str().unwrap();
        let updated = server
            .patch(&format!("/api/deals/{id}"))
            .json(&json!({ "stage": "negotiation" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<serde_json::Value>()["stage"], "negotiation");
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_client_reference_is_404(pool: PgPool) {
        let mut server = create_test_app(pool).await;

        signup(&server, "owner@example.com").await;
        let client = server
            .post("/api/clients")
            .json(&json!({ "name": "Mine" }))
            .await
            .json::<serde_json::Value>();

        server.clear_cookies();
        signup(&server, "intruder@example.com").await;
        let response = server
            .post("/api/deals")
            .json(&json!({ "title": "Poach", "client_id": client["id"] }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
