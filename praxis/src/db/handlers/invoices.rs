//! Repository for invoices, including the draft → sent → paid lifecycle.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::invoices::{
    InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest,
};
use crate::types::{InvoiceId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, client_id, number, amount, status, issued_date, \
                       due_date, sent_at, paid_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct InvoiceFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Invoices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Invoices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    async fn exists(&mut self, org: OrganizationId, id: InvoiceId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1 AND organization_id = $2)",
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
        id: InvoiceId,
        from: &str,
        set_clause: &str,
    ) -> Result<InvoiceDBResponse> {
        let updated = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "UPDATE invoices SET {set_clause}, updated_at = now() \
             WHERE id = $1 AND organization_id = $2 AND status = '{from}' \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        match updated {
            Some(invoice) => Ok(invoice),
            None if self.exists(org, id).await? => Err(DbError::InvalidState(format!(
                "invoice is not in {from} status"
            ))),
            None => Err(DbError::NotFound),
        }
    }

    /// draft → sent, stamping `sent_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), invoice_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_sent(
        &mut self,
        org: OrganizationId,
        id: InvoiceId,
    ) -> Result<InvoiceDBResponse> {
        self.transition(org, id, "draft", "status = 'sent', sent_at = now()")
            .await
    }

    /// sent → paid, stamping `paid_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), invoice_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_paid(
        &mut self,
        org: OrganizationId,
        id: InvoiceId,
    ) -> Result<InvoiceDBResponse> {
        self.transition(org, id, "sent", "status = 'paid', paid_at = now()")
            .await
    }
}

#[async_trait]
impl ScopedRepository for Invoices<'_> {
    type CreateRequest = InvoiceCreateDBRequest;
    type UpdateRequest = InvoiceUpdateDBRequest;
    type Response = InvoiceDBResponse;
    type Id = InvoiceId;
    type Filter = InvoiceFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &InvoiceCreateDBRequest,
    ) -> Result<InvoiceDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "INSERT INTO invoices (organization_id, client_id, number, amount, issued_date, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(&request.number)
        .bind(request.amount)
        .bind(request.issued_date)
        .bind(request.due_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(invoice)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), invoice_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: InvoiceId,
    ) -> Result<Option<InvoiceDBResponse>> {
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(invoice)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM invoices WHERE organization_id = "
        ));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            query.push(" AND number ILIKE ");
            query.push_bind(format!("%{search}%"));
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let invoices = query
            .build_query_as::<InvoiceDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(invoices)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), invoice_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: InvoiceId,
        request: &InvoiceUpdateDBRequest,
    ) -> Result<InvoiceDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "UPDATE invoices SET \
                client_id = COALESCE($3, client_id), \
                number = COALESCE($4, number), \
                amount = COALESCE($5, amount), \
                issued_date = COALESCE($6, issued_date), \
                due_date = COALESCE($7, due_date), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.client_id)
        .bind(&request.number)
        .bind(request.amount)
        .bind(request.issued_date)
        .bind(request.due_date)
        .fetch_optional(&mut *self.db)
        .await?;
        invoice.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), invoice_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: InvoiceId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND organization_id = $2")
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
    use crate::api::models::invoices::InvoiceStatus;
    use crate::db::handlers::Organizations;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn request(number: &str) -> InvoiceCreateDBRequest {
        InvoiceCreateDBRequest {
            client_id: None,
            number: number.to_string(),
            amount: Decimal::new(150_000, 2),
            issued_date: None,
            due_date: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_lifecycle(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut invoices = Invoices::new(&mut conn);
        let created = invoices.create(org, &request("INV-0001")).await.unwrap();
        assert_eq!(created.status, InvoiceStatus::Draft);

        // cannot pay a draft
        let err = invoices.mark_paid(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let sent = invoices.mark_sent(org, created.id).await.unwrap();
        assert_eq!(sent.status, InvoiceStatus::Sent);
        assert!(sent.sent_at.is_some());

        let paid = invoices.mark_paid(org, created.id).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_at.is_some());
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut invoices = Invoices::new(&mut conn);
        let created = invoices.create(org_a, &request("INV-0002")).await.unwrap();

        let err = invoices.mark_sent(org_b, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
        assert!(invoices.get_by_id(org_b, created.id).await.unwrap().is_none());
    }
}
