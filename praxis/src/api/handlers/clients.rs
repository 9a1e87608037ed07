//! Handlers for `/api/clients`.

use crate::AppState;
use crate::api::models::clients::{ClientCreate, ClientResponse, ClientUpdate, ListClientsQuery};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Clients, ScopedRepository, clients::ClientFilter};
use crate::errors::{Error, Result};
use crate::types::ClientId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/clients",
    params(ListClientsQuery),
    responses(
        (status = 200, description = "Clients in the caller's organization", body = Vec<ClientResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "clients"
)]
#[tracing::instrument(skip_all)]
pub async fn list_clients(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListClientsQuery>,
) -> Result<Json<Vec<ClientResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ClientFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let clients = Clients::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body = ClientCreate,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "clients"
)]
#[tracing::instrument(skip_all)]
pub async fn create_client(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ClientCreate>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let client = Clients::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Client", body = ClientResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "clients"
)]
#[tracing::instrument(skip_all)]
pub async fn get_client(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ClientId>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let client = Clients::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("client", id))?;
    Ok(Json(client.into()))
}

#[utoipa::path(
    patch,
    path = "/clients/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "clients"
)]
#[tracing::instrument(skip_all)]
pub async fn update_client(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ClientId>,
    Json(request): Json<ClientUpdate>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let client = Clients::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("client", id),
            other => Error::Database(other),
        })?;
    Ok(Json(client.into()))
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "clients"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_client(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ClientId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Clients::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("client", id))
    }
}
