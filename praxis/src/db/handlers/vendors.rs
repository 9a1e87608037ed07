//! Repository for vendors.
//!
//! Vendors only support list and create on the API surface, so this
//! repository does not implement the full `ScopedRepository` trait;
//! `get_by_id` exists for bill ownership checks and tests.

use crate::db::errors::Result;
use crate::db::models::vendors::{VendorCreateDBRequest, VendorDBResponse};
use crate::types::{OrganizationId, VendorId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, name, contact_email, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct VendorFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Vendors<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Vendors<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    pub async fn create(
        &mut self,
        org: OrganizationId,
        request: &VendorCreateDBRequest,
    ) -> Result<VendorDBResponse> {
        let vendor = sqlx::query_as::<_, VendorDBResponse>(&format!(
            "INSERT INTO vendors (organization_id, name, contact_email, notes) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(&request.name)
        .bind(&request.contact_email)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(vendor)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), vendor_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: VendorId,
    ) -> Result<Option<VendorDBResponse>> {
        let vendor = sqlx::query_as::<_, VendorDBResponse>(&format!(
            "SELECT {COLUMNS} FROM vendors WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(vendor)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    pub async fn list(
        &mut self,
        org: OrganizationId,
        filter: &VendorFilter,
    ) -> Result<Vec<VendorDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM vendors WHERE organization_id = "
        ));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            query.push(" AND name ILIKE ");
            query.push_bind(format!("%{search}%"));
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let vendors = query
            .build_query_as::<VendorDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(vendors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Organizations;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_list_is_tenant_scoped(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut vendors = Vendors::new(&mut conn);
        vendors
            .create(
                org_a,
                &VendorCreateDBRequest {
                    name: "Paper Co".to_string(),
                    contact_email: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let filter = VendorFilter {
            skip: 0,
            limit: 10,
            search: None,
        };
        assert_eq!(vendors.list(org_a, &filter).await.unwrap().len(), 1);
        assert!(vendors.list(org_b, &filter).await.unwrap().is_empty());
    }
}
