//! Handlers for `/api/proposals`, including the send/sign lifecycle.

use crate::AppState;
use crate::api::models::proposals::{
    ListProposalsQuery, ProposalCreate, ProposalResponse, ProposalUpdate,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Proposals, ScopedRepository, proposals::ProposalFilter};
use crate::errors::{Error, Result};
use crate::types::ProposalId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/proposals",
    params(ListProposalsQuery),
    responses(
        (status = 200, description = "Proposals in the caller's organization", body = Vec<ProposalResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn list_proposals(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListProposalsQuery>,
) -> Result<Json<Vec<ProposalResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ProposalFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let proposals = Proposals::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(proposals.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/proposals",
    request_body = ProposalCreate,
    responses(
        (status = 201, description = "Proposal created in draft", body = ProposalResponse),
        (status = 404, description = "Referenced client or deal not found in the caller's organization"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn create_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ProposalCreate>,
) -> Result<(StatusCode, Json<ProposalResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let proposal = Proposals::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(proposal.into())))
}

#[utoipa::path(
    get,
    path = "/proposals/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Proposal", body = ProposalResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn get_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProposalId>,
) -> Result<Json<ProposalResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let proposal = Proposals::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("proposal", id))?;
    Ok(Json(proposal.into()))
}

#[utoipa::path(
    patch,
    path = "/proposals/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = ProposalUpdate,
    responses(
        (status = 200, description = "Proposal updated", body = ProposalResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn update_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProposalId>,
    Json(request): Json<ProposalUpdate>,
) -> Result<Json<ProposalResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let proposal = Proposals::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("proposal", id),
            other => Error::Database(other),
        })?;
    Ok(Json(proposal.into()))
}

#[utoipa::path(
    delete,
    path = "/proposals/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Proposal deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProposalId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Proposals::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("proposal", id))
    }
}

#[utoipa::path(
    post,
    path = "/proposals/{id}/send",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Proposal marked sent", body = ProposalResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Proposal is not in draft"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn send_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProposalId>,
) -> Result<Json<ProposalResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let proposal = Proposals::new(&mut conn)
        .mark_sent(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("proposal", id),
            other => Error::Database(other),
        })?;
    Ok(Json(proposal.into()))
}

#[utoipa::path(
    post,
    path = "/proposals/{id}/sign",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Proposal marked signed", body = ProposalResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Proposal has not been sent"),
    ),
    tag = "proposals"
)]
#[tracing::instrument(skip_all)]
pub async fn sign_proposal(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ProposalId>,
) -> Result<Json<ProposalResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let proposal = Proposals::new(&mut conn)
        .mark_signed(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("proposal", id),
            other => Error::Database(other),
        })?;
    Ok(Json(proposal.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_send_then_sign(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "docs@example.com").await;

        let created = server
            .post("/api/proposals")
            .json(&json!({ "title": "Q3 retainer", "amount": "45000.00" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let proposal: serde_json::Value = created.json();
        assert_eq!(proposal["status"], "draft");
        let id = proposal["id"].as_str().unwrap();

        // signing before sending conflicts
        let premature = server.post(&format!("/api/proposals/{id}/sign")).await;
        premature.assert_status(StatusCode::CONFLICT);

        let sent = server.post(&format!("/api/proposals/{id}/send")).await;
        sent.assert_status_ok();
        assert_eq!(sent.json::<serde_json::Value>()["status"], "sent");

        let resend = server.post(&format!("/api/proposals/{id}/send")).await;
        resend.assert_status(StatusCode::CONFLICT);

        let signed = server.post(&format!("/api/proposals/{id}/sign")).await;
        signed.assert_status_ok();
        let body: serde_json::Value = signed.json();
        assert_eq!(body["status"], "signed");
        assert!(body["signed_at"].is_string());
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_send_is_404(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "author@example.com").await;
        let proposal = server
            .post("/api/proposals")
            .json(&json!({ "title": "Confidential" }))
            .await
            .json::<serde_json::Value>();
        let id = proposal["id"].as_str().unwrap().to_string();

        server.clear_cookies();
        signup(&server, "outsider@example.com").await;
        let response = server.post(&format!("/api/proposals/{id}/send")).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
