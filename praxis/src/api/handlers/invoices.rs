//! Handlers for `/api/invoices`, including the send/mark-paid lifecycle.

use crate::AppState;
use crate::api::models::invoices::{
    InvoiceCreate, InvoiceResponse, InvoiceUpdate, ListInvoicesQuery,
};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Invoices, ScopedRepository, invoices::InvoiceFilter};
use crate::errors::{Error, Result};
use crate::types::InvoiceId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/invoices",
    params(ListInvoicesQuery),
    responses(
        (status = 200, description = "Invoices in the caller's organization", body = Vec<InvoiceResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn list_invoices(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<Vec<InvoiceResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = InvoiceFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let invoices = Invoices::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/invoices",
    request_body = InvoiceCreate,
    responses(
        (status = 201, description = "Invoice created in draft", body = InvoiceResponse),
        (status = 404, description = "Referenced client or engagement not found in the caller's organization"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn create_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<InvoiceCreate>,
) -> Result<(StatusCode, Json<InvoiceResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let invoice = Invoices::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Invoice", body = InvoiceResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn get_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<InvoiceId>,
) -> Result<Json<InvoiceResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let invoice = Invoices::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("invoice", id))?;
    Ok(Json(invoice.into()))
}

#[utoipa::path(
    patch,
    path = "/invoices/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = InvoiceUpdate,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn update_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<InvoiceId>,
    Json(request): Json<InvoiceUpdate>,
) -> Result<Json<InvoiceResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let invoice = Invoices::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("invoice", id),
            other => Error::Database(other),
        })?;
    Ok(Json(invoice.into()))
}

#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<InvoiceId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Invoices::new(&mut conn)
        .delete(ctx.organization_id, id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("invoice", id))
    }
}

#[utoipa::path(
    post,
    path = "/invoices/{id}/send",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Invoice marked sent", body = InvoiceResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Invoice is not in draft"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn send_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<InvoiceId>,
) -> Result<Json<InvoiceResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let invoice = Invoices::new(&mut conn)
        .mark_sent(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("invoice", id),
            other => Error::Database(other),
        })?;
    Ok(Json(invoice.into()))
}

#[utoipa::path(
    post,
    path = "/invoices/{id}/mark-paid",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Invoice marked paid", body = InvoiceResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Invoice has not been sent"),
    ),
    tag = "invoices"
)]
#[tracing::instrument(skip_all)]
pub async fn mark_invoice_paid(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<InvoiceId>,
) -> Result<Json<InvoiceResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let invoice = Invoices::new(&mut conn)
        .mark_paid(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("invoice", id),
            other => Error::Database(other),
        })?;
    Ok(Json(invoice.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_draft_sent_paid_flow(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "billing@example.com").await;

        let created = server
            .post("/api/invoices")
            .json(&json!({ "number": "INV-001", "amount": "12500.00" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let invoice: serde_json::Value = created.json();
        assert_eq!(invoice["status"], "draft");
        let id = invoice["id"].as_str().unwrap();

        // paying a draft conflicts
        server
            .post(&format!("/api/invoices/{id}/mark-paid"))
            .await
            .assert_status(StatusCode::CONFLICT);

        let sent = server.post(&format!("/api/invoices/{id}/send")).await;
        sent.assert_status_ok();
        assert_eq!(sent.json::<serde_json::Value>()["status"], "sent");

        let paid = server.post(&format!("/api/invoices/{id}/mark-paid")).await;
        paid.assert_status_ok();
        let body: serde_json::Value = paid.json();
        assert_eq!(body["status"], "paid");
        assert!(body["paid_at"].is_string());

        // terminal state rejects further transitions
        server
            .post(&format!("/api/invoices/{id}/send"))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_invoice_is_masked(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "issuer@example.com").await;
        let invoice = server
            .post("/api/invoices")
            .json(&json!({ "number": "INV-777", "amount": "100.00" }))
            .await
            .json::<serde_json::Value>();
        let id = invoice["id"].as_str().unwrap().to_string();

        server.clear_cookies();
        signup(&server, "snoop@example.com").await;
        server
            .post(&format!("/api/invoices/{id}/send"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format!("/api/invoices/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
