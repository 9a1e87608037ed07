//! Handlers for `/api/bills`, including the approve/reject/mark-paid
//! lifecycle.

use crate::AppState;
use crate::api::models::bills::{BillCreate, BillResponse, BillUpdate, ListBillsQuery};
use crate::auth::OrgContext;
use crate::db::errors::DbError;
use crate::db::handlers::{Bills, ScopedRepository, bills::BillFilter};
use crate::errors::{Error, Result};
use crate::types::BillId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/bills",
    params(ListBillsQuery),
    responses(
        (status = 200, description = "Bills in the caller's organization", body = Vec<BillResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn list_bills(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<BillResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = BillFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let bills = Bills::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/bills",
    request_body = BillCreate,
    responses(
        (status = 201, description = "Bill created pending approval", body = BillResponse),
        (status = 404, description = "Referenced vendor not found in the caller's organization"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn create_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<BillCreate>,
) -> Result<(StatusCode, Json<BillResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(bill.into())))
}

#[utoipa::path(
    get,
    path = "/bills/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Bill", body = BillResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn get_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
) -> Result<Json<BillResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .get_by_id(ctx.organization_id, id)
        .await?
        .ok_or_else(|| Error::not_found("bill", id))?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    patch,
    path = "/bills/{id}",
    params(("id" = String, Path, format = "uuid")),
    request_body = BillUpdate,
    responses(
        (status = 200, description = "Bill updated", body = BillResponse),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn update_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
    Json(request): Json<BillUpdate>,
) -> Result<Json<BillResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .update(ctx.organization_id, id, &request.into())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("bill", id),
            other => Error::Database(other),
        })?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    delete,
    path = "/bills/{id}",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 204, description = "Bill deleted"),
        (status = 404, description = "Not found in the caller's organization"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
) -> Result<StatusCode> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let deleted = Bills::new(&mut conn).delete(ctx.organization_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("bill", id))
    }
}

#[utoipa::path(
    post,
    path = "/bills/{id}/approve",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Bill approved", body = BillResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Bill is not pending"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn approve_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
) -> Result<Json<BillResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .approve(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("bill", id),
            other => Error::Database(other),
        })?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    post,
    path = "/bills/{id}/reject",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Bill rejected", body = BillResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Bill is not pending"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn reject_bill(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
) -> Result<Json<BillResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .reject(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("bill", id),
            other => Error::Database(other),
        })?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    post,
    path = "/bills/{id}/mark-paid",
    params(("id" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Bill marked paid", body = BillResponse),
        (status = 404, description = "Not found in the caller's organization"),
        (status = 409, description = "Bill has not been approved"),
    ),
    tag = "bills"
)]
#[tracing::instrument(skip_all)]
pub async fn mark_bill_paid(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<BillId>,
) -> Result<Json<BillResponse>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let bill = Bills::new(&mut conn)
        .mark_paid(ctx.organization_id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("bill", id),
            other => Error::Database(other),
        })?;
    Ok(Json(bill.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_approval_flow(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "payables@example.com").await;

        let vendor = server
            .post("/api/vendors")
            .json(&json!({ "name": "Paper Co" }))
            .await
            .json::<serde_json::Value>();

        let created = server
            .post("/api/bills")
            .json(&json!({
                "reference": "BILL-42",
                "amount": "830.00",
                "vendor_id": vendor["id"]
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let bill: serde_json::Value = created.json();
        assert_eq!(bill["status"], "pending");
        let id = bill["id"].as_str().unwrap();

        // paying before approval conflicts
        server
            .post(&format!("/api/bills/{id}/mark-paid"))
            .await
            .assert_status(StatusCode::CONFLICT);

        let approved = server.post(&format!("/api/bills/{id}/approve")).await;
        approved.assert_status_ok();
        assert_eq!(approved.json::<serde_json::Value>()["status"], "approved");

        // approved bills can no longer be rejected
        server
            .post(&format!("/api/bills/{id}/reject"))
            .await
            .assert_status(StatusCode::CONFLICT);

        let paid = server.post(&format!("/api/bills/{id}/mark-paid")).await;
        paid.assert_status_ok();
        let body: serde_json::Value = paid.json();
        assert_eq!(body["status"], "paid");
        assert!(body["paid_at"].is_string());
    }

    #[test_log::test(sqlx::test)]
    async fn test_rejection_is_terminal(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "reviewer@example.com").await;

        let bill = server
            .post("/api/bills")
            .json(&json!({ "reference": "BILL-43", "amount": "99.00" }))
            .await
            .json::<serde_json::Value>();
        let id = bill["id"].as_str().unwrap();

        let rejected = server.post(&format!("/api/bills/{id}/reject")).await;
        rejected.assert_status_ok();
        assert_eq!(rejected.json::<serde_json::Value>()["status"], "rejected");

        server
            .post(&format!("/api/bills/{id}/approve"))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .post(&format!("/api/bills/{id}/mark-paid"))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_vendor_reference_is_404(pool: PgPool) {
        let mut server = create_test_app(pool).await;
        signup(&server, "org-a@example.com").await;
        let vendor = server
            .post("/api/vendors")
            .json(&json!({ "name": "Exclusive Vendor" }))
            .await
            .json::<serde_json::Value>();

        server.clear_cookies();
        signup(&server, "org-b@example.com").await;
        let response = server
            .post("/api/bills")
            .json(&json!({
                "reference": "BILL-X",
                "amount": "1.00",
                "vendor_id": vendor["id"]
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
