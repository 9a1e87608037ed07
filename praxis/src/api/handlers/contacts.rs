//! Handlers for `/api/contacts`.

use crate::AppState;
use crate::api::models::contacts::{
    ContactCreate, ContactResponse, ContactUpdate, ListContactsQuery,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Contacts, ScopedRepository, contacts::ContactFilter};
use crate::errors::{Error, Result};
use crate::types::ContactId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "Contacts in the caller's organization", body = Vec<ContactResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "contacts"
)]
#[tracing::instrument(skip_all)]
pub async fn list_contacts(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<Vec<ContactResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = ContactFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let contacts = Contacts::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/contacts",
    request_body = ContactCreate,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 404, description = "Referenced client not found in the caller's organization"),
    ),
    tag = "contacts"
)]
#[tracing::instrument(skip_all)]
pub async fn create_contact(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<ContactCreate>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    // a cross-tenant or dangling client reference surfaces as 404
    let contact = Contacts::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contacts"
)]
#[tracing::instrument(skip_all)]
pub async fn get_contact(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContactId>,
) -> Result<Json<ContactResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contact = Contacts::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("contact", id))?;
    Ok(Json(contact.into()))
}

#[utoipa::path(
    patch,
    path = "/contacts/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = ContactUpdate,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contacts"
)]
#[tracing::instrument(skip_all)]
pub async fn update_contact(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContactId>,
    Json(request): Json<ContactUpdate>,
) -> Result<Json<ContactResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let contact = Contacts::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("contact", id),
            other => Error::Database(other),
        })?;
    Ok(Json(contact.into()))
}

#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "contacts"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_contact(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<ContactId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Contacts::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("contact", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_contact_linked_to_client(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "contacts@example.com").await;

        let client = server
            .post("/api/clients")
            .json(&json!({ "name": "Globex" }))
            .await
            .json::<serde_json::Value>();

        let created = server
            .post("/api/contacts")
            .json(&json!({
                "client_id": client["id"],
                "first_name": "Hank",
                "last_name": "Scorpio",
                "email": "hank@globex.example"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let contact: serde_json::Value = created.json();
        assert_eq!(contact["client_id"], client["id"]);
    }

    #[test_log::test(sqlx::test)]
    async fn test_search(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "search@example.com").await;

        for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing")] {
            server
                .post("/api/contacts")
                .json(&json!({ "first_name": first, "last_name": last }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let found = server.get("/api/contacts?search=love").await;
        found.assert_status_ok();
        assert_eq!(found.json::<Vec<serde_json::Value>>().len(), 1);
    }
}
