//! Handlers for `/api/contracts`, including the send/sign lifecycle.

use crate::AppState;
use crate::api::models::contracts::{
    ContractCreate, ContractResponse, ContractUpdate, ListContractsQuery,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Contracts, ScopedRepository, contracts::ContractFilter};
use crate::errors::{Error, Result};
use crate::types::ContractId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/contracts",
    params(ListContractsQuery),
    responses(
        (status = 200, description = "Contracts in the caller's organization", body = Vec<ContractResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn list_contracts(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListContractsQuery>,
) -> Result<Json<Vec<ContractResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ContractFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let contracts = Contracts::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(contracts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/contracts",
    request_body = ContractCreate,
    responses(
        (status = 201, description = "Contract created in draft", body = ContractResponse),
        (status = 404, description = "Referenced client or proposal not found in the caller's organization"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn create_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ContractCreate>,
) -> Result<(StatusCode, Json<ContractResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contract = Contracts::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(contract.into())))
}

#[utoipa::path(
    get,
    path = "/contracts/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Contract", body = ContractResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn get_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContractId>,
) -> Result<Json<ContractResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contract = Contracts::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("contract", id))?;
    Ok(Json(contract.into()))
}

#[utoipa::path(
    patch,
    path = "/contracts/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = ContractUpdate,
    responses(
        (status = 200, description = "Contract updated", body = ContractResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn update_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContractId>,
    Json(request): Json<ContractUpdate>,
) -> Result<Json<ContractResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contract = Contracts::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("contract", id),
            other => Error::Database(other),
        })?;
    Ok(Json(contract.into()))
}

#[utoipa::path(
    delete,
    path = "/contracts/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContractId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Contracts::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("contract", id))
    }
}

#[utoipa::path(
    post,
    path = "/contracts/{id}/send",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Contract marked sent", body = ContractResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Contract is not in draft"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn send_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContractId>,
) -> Result<Json<ContractResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contract = Contracts::new(&mut conn)
        .mark_sent(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("contract", id),
            other => Error::Database(other),
        })?;
    Ok(Json(contract.into()))
}

#[utoipa::path(
    post,
    path = "/contracts/{id}/sign",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Contract marked signed", body = ContractResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Contract has not been sent"),
    ),
    tag = "contracts"
)]
#[tracing::instrument(skip_all)]
pub async fn sign_contract(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContractId>,
) -> Result<Json<ContractResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contract = Contracts::new(&mut conn)
        .mark_signed(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("contract", id),
            other => Error::Database(other),
        })?;
    Ok(Json(contract.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_contract_from_proposal(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "legal@example.com").await;

        let proposal = server
            .post("/api/proposals")
            .json(&json!({ "title": "SOW v1" }))
            .await
            .json::<serde_json::Value>();

        let created = server
            .post("/api/contracts")
            .json(&json!({ "title": "MSA", "proposal_id": proposal["id"] }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let contract: serde_json::Value = created.json();
        assert_eq!(contract["status"], "draft");
        assert_eq!(contract["proposal_id"], proposal["id"]);
    }

    #[test_log::test(sqlx::test)]
    async fn test_lifecycle_transitions(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "signer@example.com").await;

        let contract = server
            .post("/api/contracts")
            .json(&json!({ "title": "MSA" }))
            .await
            .json::<serde_json::Value>();
        let id = contract["id"].as_str().unwrap();

        server
            .post(&format!("/api/contracts/{id}/sign"))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .post(&format!("/api/contracts/{id}/send"))
            .await
            .assert_status_ok();
        let signed = server.post(&format!("/api/contracts/{id}/sign")).await;
        signed.assert_status_ok();
        assert_eq!(signed.json::<serde_json::Value>()["status"], "signed");
    }
}
