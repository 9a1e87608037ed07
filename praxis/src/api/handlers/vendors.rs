//! Handlers for `/api/vendors`.
//!
//! Vendors are reference data for bills; the API exposes only list and
//! create.

use crate::AppState;
use crate::api::models::vendors::{ListVendorsQuery, VendorCreate, VendorResponse};
use crate::auth::OrgContext;
use crate::db::handlers::{Vendors, vendors::VendorFilter};
use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/vendors",
    params(ListVendorsQuery),
    responses(
        (status = 200, description = "Vendors in the caller's organization", body = Vec<VendorResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "vendors"
)]
#[tracing::instrument(skip_all)]
pub async fn list_vendors(
    State(state): State<AppState>,
    ctx: OrgContext,
    Query(query): Query<ListVendorsQuery>,
) -> Result<Json<Vec<VendorResponse>>> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let filter = VendorFilter {
        skip: query.pagination.skip(),
        limit: query.pagination.limit(),
        search: query.search,
    };
    let vendors = Vendors::new(&mut conn)
        .list(ctx.organization_id, &filter)
        .await?;
    Ok(Json(vendors.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/vendors",
    request_body = VendorCreate,
    responses(
        (status = 201, description = "Vendor created", body = VendorResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "vendors"
)]
#[tracing::instrument(skip_all)]
pub async fn create_vendor(
    State(state): State<AppState>,
    ctx: OrgContext,
    Json(request): Json<VendorCreate>,
) -> Result<(StatusCode, Json<VendorResponse>)> {
    let mut conn = state
        .db
        .acquire()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    let vendor = Vendors::new(&mut conn)
        .create(ctx.organization_id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(vendor.into())))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, signup};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_create_and_list(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "ap@example.com").await;

        let created = server
            .post("/api/vendors")
            .json(&json!({ "name": "Paper Co", "contact_email": "billing@paper.example" }))
            .await;
        created.assert_status(StatusCode::CREATED);

        let list = server.get("/api/vendors").await;
        list.assert_status_ok();
        let vendors: Vec<serde_json::Value> = list.json();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0]["name"], "Paper Co");
    }

    #[test_log::test(sqlx::test)]
    async fn test_no_item_routes(pool: PgPool) {
        let server = create_test_app(pool).await;
        signup(&server, "ap2@example.com").await;

        let created = server
            .post("/api/vendors")
            .json(&json!({ "name": "Cleaning Co" }))
            .await
            .json::<serde_json::Value>();
        let id = created["id"].as_str().unwrap();

        // vendors expose no GET/PATCH/DELETE item routes
        server
            .get(&format!("/api/vendors/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/vendors/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
