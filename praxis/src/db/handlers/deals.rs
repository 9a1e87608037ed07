//! Repository for deals.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::deals::{DealCreateDBRequest, DealDBResponse, DealUpdateDBRequest};
use crate::types::{DealId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, client_id, title, value, stage, \
                       expected_close_date, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct DealFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Deals<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Deals<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScopedRepository for Deals<'_> {
    type CreateRequest = DealCreateDBRequest;
    type UpdateRequest = DealUpdateDBRequest;
    type Response = DealDBResponse;
    type Id = DealId;
    type Filter = DealFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &DealCreateDBRequest,
    ) -> Result<DealDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let deal = sqlx::query_as::<_, DealDBResponse>(&format!(
            "INSERT INTO deals (organization_id, client_id, title, value, stage, expected_close_date, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(&request.title)
        .bind(request.value)
        .bind(request.stage)
        .bind(request.expected_close_date)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(deal)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), deal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(&mut self, org: OrganizationId, id: DealId) -> Result<Option<DealDBResponse>> {
        let deal = sqlx::query_as::<_, DealDBResponse>(&format!(
            "SELECT {COLUMNS} FROM deals WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(deal)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(&mut self, org: OrganizationId, filter: &DealFilter) -> Result<Vec<DealDBResponse>> {
        let mut query =
            sqlx::QueryBuilder::new(format!("SELECT {COLUMNS} FROM deals WHERE organization_id = "));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            query.push(" AND title ILIKE ");
            query.push_bind(format!("%{search}%"));
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let deals = query
            .build_query_as::<DealDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(deals)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), deal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: DealId,
        request: &DealUpdateDBRequest,
    ) -> Result<DealDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let deal = sqlx::query_as::<_, DealDBResponse>(&format!(
            "UPDATE deals SET \
                client_id = COALESCE($3, client_id), \
                title = COALESCE($4, title), \
                value = COALESCE($5, value), \
                stage = COALESCE($6, stage), \
                expected_close_date = COALESCE($7, expected_close_date), \
                notes = COALESCE($8, notes), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.client_id)
        .bind(&request.title)
        .bind(request.value)
        .bind(request.stage)
        .bind(request.expected_close_date)
        .bind(&request.notes)
        .fetch_optional(&mut *self.db)
        .await?;
        deal.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), deal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: DealId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1 AND organization_id = $2")
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
    use crate::api::models::deals::DealStage;
    use crate::db::handlers::Organizations;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn request(title: &str) -> DealCreateDBRequest {
        DealCreateDBRequest {
            client_id: None,
            title: title.to_string(),
            value: Some(Decimal::new(2_500_000, 2)),
            stage: DealStage::Lead,
            expected_close_date: None,
            notes: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_stage_transitions_via_update(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut deals = Deals::new(&mut conn);
        let deal = deals.create(org, &request("Retainer renewal")).await.unwrap();
        assert_eq!(deal.stage, DealStage::Lead);
        assert_eq!(deal.value, Some(Decimal::new(2_500_000, 2)));

        let updated = deals
            .update(
                org,
                deal.id,
                &DealUpdateDBRequest {
                    stage: Some(DealStage::Won),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stage, DealStage::Won);
        assert_eq!(updated.title, "Retainer renewal");
    }

    #[test_log::test(sqlx::test)]
    async fn test_org_scoping(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut deals = Deals::new(&mut conn);
        let deal = deals.create(org_a, &request("Hidden")).await.unwrap();

        assert!(deals.get_by_id(org_b, deal.id).await.unwrap().is_none());
        let err = deals
            .update(org_b, deal.id, &DealUpdateDBRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
