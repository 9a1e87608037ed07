//! Repository for engagements.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::engagements::{
    EngagementCreateDBRequest, EngagementDBResponse, EngagementUpdateDBRequest,
};
use crate::types::{EngagementId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, client_id, contract_id, name, status, \
                       start_date, end_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EngagementFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Engagements<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Engagements<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScopedRepository for Engagements<'_> {
    type CreateRequest = EngagementCreateDBRequest;
    type UpdateRequest = EngagementUpdateDBRequest;
    type Response = EngagementDBResponse;
    type Id = EngagementId;
    type Filter = EngagementFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &EngagementCreateDBRequest,
    ) -> Result<EngagementDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(contract_id) = request.contract_id {
            ensure_owned(self.db, "contracts", contract_id, org).await?;
        }
        let engagement = sqlx::query_as::<_, EngagementDBResponse>(&format!(
            "INSERT INTO engagements (organization_id, client_id, contract_id, name, status, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(request.contract_id)
        .bind(&request.name)
        .bind(request.status)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(engagement)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), engagement_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: EngagementId,
    ) -> Result<Option<EngagementDBResponse>> {
        let engagement = sqlx::query_as::<_, EngagementDBResponse>(&format!(
            "SELECT {COLUMNS} FROM engagements WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(engagement)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &EngagementFilter,
    ) -> Result<Vec<EngagementDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM engagements WHERE organization_id = "
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

        let engagements = query
            .build_query_as::<EngagementDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(engagements)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), engagement_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: EngagementId,
        request: &EngagementUpdateDBRequest,
    ) -> Result<EngagementDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(contract_id) = request.contract_id {
            ensure_owned(self.db, "contracts", contract_id, org).await?;
        }
        let engagement = sqlx::query_as::<_, EngagementDBResponse>(&format!(
            "UPDATE engagements SET \
                client_id = COALESCE($3, client_id), \
                contract_id = COALESCE($4, contract_id), \
                name = COALESCE($5, name), \
                status = COALESCE($6, status), \
                start_date = COALESCE($7, start_date), \
                end_date = COALESCE($8, end_date), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.client_id)
        .bind(request.contract_id)
        .bind(&request.name)
        .bind(request.status)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_optional(&mut *self.db)
        .await?;
        engagement.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), engagement_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: EngagementId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM engagements WHERE id = $1 AND organization_id = $2")
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
    use crate::api::models::engagements::EngagementStatus;
    use crate::db::handlers::Organizations;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_org_scoping(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut engagements = Engagements::new(&mut conn);
        let created = engagements
            .create(
                org_a,
                &EngagementCreateDBRequest {
                    client_id: None,
                    contract_id: None,
                    name: "Annual audit".to_string(),
                    status: EngagementStatus::Active,
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.organization_id, org_a);
        assert_eq!(created.status, EngagementStatus::Active);

        assert!(engagements.get_by_id(org_b, created.id).await.unwrap().is_none());
        assert!(!engagements.delete(org_b, created.id).await.unwrap());
    }
}
