//! Repository for bills payable: pending → approved → paid, with rejection.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::bills::{BillCreateDBRequest, BillDBResponse, BillUpdateDBRequest};
use crate::types::{BillId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, vendor_id, reference, amount, status, due_date, \
                       approved_at, paid_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct BillFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Bills<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Bills<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    async fn exists(&mut self, org: OrganizationId, id: BillId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bills WHERE id = $1 AND organization_id = $2)",
        )
        .bind(id)
        .bind(org)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(exists)
    }

    async fn transition(
        &mut self,
        org: OrganizationId,
        id: BillId,
        from: &str,
        set_clause: &str,
    ) -> Result<BillDBResponse> {
        let updated = sqlx::query_as::<_, BillDBResponse>(&format!(
            "UPDATE bills SET {set_clause}, updated_at = now() \
             WHERE id = $1 AND organization_id = $2 AND status = '{from}' \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        match updated {
            Some(bill) => Ok(bill),
            None if self.exists(org, id).await? => Err(DbError::InvalidState(format!(
                "bill is not in {from} status"
            ))),
            None => Err(DbError::NotFound),
        }
    }

    /// pending → approved, stamping `approved_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn approve(&mut self, org: OrganizationId, id: BillId) -> Result<BillDBResponse> {
        self.transition(org, id, "pending", "status = 'approved', approved_at = now()")
            .await
    }

    /// pending → rejected.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn reject(&mut self, org: OrganizationId, id: BillId) -> Result<BillDBResponse> {
        self.transition(org, id, "pending", "status = 'rejected'").await
    }

    /// approved → paid, stamping `paid_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_paid(&mut self, org: OrganizationId, id: BillId) -> Result<BillDBResponse> {
        self.transition(org, id, "approved", "status = 'paid', paid_at = now()")
            .await
    }
}

#[async_trait]
impl ScopedRepository for Bills<'_> {
    type CreateRequest = BillCreateDBRequest;
    type UpdateRequest = BillUpdateDBRequest;
    type Response = BillDBResponse;
    type Id = BillId;
    type Filter = BillFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &BillCreateDBRequest,
    ) -> Result<BillDBResponse> {
        if let Some(vendor_id) = request.vendor_id {
            ensure_owned(self.db, "vendors", vendor_id, org).await?;
        }
        let bill = sqlx::query_as::<_, BillDBResponse>(&format!(
            "INSERT INTO bills (organization_id, vendor_id, reference, amount, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.vendor_id)
        .bind(&request.reference)
        .bind(request.amount)
        .bind(request.due_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(bill)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(&mut self, org: OrganizationId, id: BillId) -> Result<Option<BillDBResponse>> {
        let bill = sqlx::query_as::<_, BillDBResponse>(&format!(
            "SELECT {COLUMNS} FROM bills WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(bill)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(&mut self, org: OrganizationId, filter: &BillFilter) -> Result<Vec<BillDBResponse>> {
        let mut query =
            sqlx::QueryBuilder::new(format!("SELECT {COLUMNS} FROM bills WHERE organization_id = "));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            query.push(" AND reference ILIKE ");
            query.push_bind(format!("%{search}%"));
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let bills = query
            .build_query_as::<BillDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(bills)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: BillId,
        request: &BillUpdateDBRequest,
    ) -> Result<BillDBResponse> {
        if let Some(vendor_id) = request.vendor_id {
            ensure_owned(self.db, "vendors", vendor_id, org).await?;
        }
        let bill = sqlx::query_as::<_, BillDBResponse>(&format!(
            "UPDATE bills SET \
                vendor_id = COALESCE($3, vendor_id), \
                reference = COALESCE($4, reference), \
                amount = COALESCE($5, amount), \
                due_date = COALESCE($6, due_date), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.vendor_id)
        .bind(&request.reference)
        .bind(request.amount)
        .bind(request.due_date)
        .fetch_optional(&mut *self.db)
        .await?;
        bill.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), bill_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: BillId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(org)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::bills::BillStatus;
    use crate::db::handlers::Organizations;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn request(reference: &str) -> BillCreateDBRequest {
        BillCreateDBRequest {
            vendor_id: None,
            reference: reference.to_string(),
            amount: Decimal::new(42_000, 2),
            due_date: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_approval_flow(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut bills = Bills::new(&mut conn);
        let created = bills.create(org, &request("BILL-77")).await.unwrap();
        assert_eq!(created.status, BillStatus::Pending);

        // cannot pay before approval
        let err = bills.mark_paid(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let approved = bills.approve(org, created.id).await.unwrap();
        assert_eq!(approved.status, BillStatus::Approved);
        assert!(approved.approved_at.is_some());

        // cannot reject once approved
        let err = bills.reject(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let paid = bills.mark_paid(org, created.id).await.unwrap();
        assert_eq!(paid.status, BillStatus::Paid);
    }

    #[test_log::test(sqlx::test)]
    async fn test_rejection(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut bills = Bills::new(&mut conn);
        let created = bills.create(org, &request("BILL-78")).await.unwrap();
        let rejected = bills.reject(org, created.id).await.unwrap();
        assert_eq!(rejected.status, BillStatus::Rejected);

        let err = bills.approve(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));
    }
}
