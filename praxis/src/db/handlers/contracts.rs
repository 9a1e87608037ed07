//! Repository for contracts. Same lifecycle as proposals.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::contracts::{
    ContractCreateDBRequest, ContractDBResponse, ContractUpdateDBRequest,
};
use crate::types::{ContractId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, client_id, proposal_id, title, body, amount, status, \
                       sent_at, signed_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ContractFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Contracts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Contracts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    async fn exists(&mut self, org: OrganizationId, id: ContractId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM contracts WHERE id = $1 AND organization_id = $2)",
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
        id: ContractId,
        from: &str,
        set_clause: &str,
    ) -> Result<ContractDBResponse> {
        let updated = sqlx::query_as::<_, ContractDBResponse>(&format!(
            "UPDATE contracts SET {set_clause}, updated_at = now() \
             WHERE id = $1 AND organization_id = $2 AND status = '{from}' \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        match updated {
            Some(contract) => Ok(contract),
            None if self.exists(org, id).await? => Err(DbError::InvalidState(format!(
                "contract is not in {from} status"
            ))),
            None => Err(DbError::NotFound),
        }
    }

    /// draft → sent, stamping `sent_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contract_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_sent(
        &mut self,
        org: OrganizationId,
        id: ContractId,
    ) -> Result<ContractDBResponse> {
        self.transition(org, id, "draft", "status = 'sent', sent_at = now()")
            .await
    }

    /// sent → signed, stamping `signed_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contract_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_signed(
        &mut self,
        org: OrganizationId,
        id: ContractId,
    ) -> Result<ContractDBResponse> {
        self.transition(org, id, "sent", "status = 'signed', signed_at = now()")
            .await
    }
}

#[async_trait]
impl ScopedRepository for Contracts<'_> {
    type CreateRequest = ContractCreateDBRequest;
    type UpdateRequest = ContractUpdateDBRequest;
    type Response = ContractDBResponse;
    type Id = ContractId;
    type Filter = ContractFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &ContractCreateDBRequest,
    ) -> Result<ContractDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(proposal_id) = request.proposal_id {
            ensure_owned(self.db, "proposals", proposal_id, org).await?;
        }
        let contract = sqlx::query_as::<_, ContractDBResponse>(&format!(
            "INSERT INTO contracts (organization_id, client_id, proposal_id, title, body, amount) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(request.proposal_id)
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.amount)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(contract)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contract_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ContractId,
    ) -> Result<Option<ContractDBResponse>> {
        let contract = sqlx::query_as::<_, ContractDBResponse>(&format!(
            "SELECT {COLUMNS} FROM contracts WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(contract)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ContractFilter,
    ) -> Result<Vec<ContractDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM contracts WHERE organization_id = "
        ));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            query.push(" AND title ILIKE ");
            query.push_bind(format!("%{search}%"));
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let contracts = query
            .build_query_as::<ContractDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(contracts)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), contract_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: ContractId,
        request: &ContractUpdateDBRequest,
    ) -> Result<ContractDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(proposal_id) = request.proposal_id {
            ensure_owned(self.db, "proposals", proposal_id, org).await?;
        }
        let contract = sqlx::query_as::<_, ContractDBResponse>(&format!(
            "UPDATE contracts SET \
                client_id = COALESCE($3, client_id), \
                proposal_id = COALESCE($4, proposal_id), \
                title = COALESCE($5, title), \
                body = COALESCE($6, body), \
                amount = COALESCE($7, amount), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.client_id)
        .bind(request.proposal_id)
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.amount)
        .fetch_optional(&mut *self.db)
        .await?;
        contract.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contract_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: ContractId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1 AND organization_id = $2")
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
    use crate::api::models::proposals::DocumentStatus;
    use crate::db::handlers::Organizations;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_lifecycle(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut contracts = Contracts::new(&mut conn);
        let created = contracts
            .create(
                org,
                &ContractCreateDBRequest {
                    client_id: None,
                    proposal_id: None,
                    title: "MSA".to_string(),
                    body: None,
                    amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.status, DocumentStatus::Draft);

        let sent = contracts.mark_sent(org, created.id).await.unwrap();
        assert_eq!(sent.status, DocumentStatus::Sent);
        let signed = contracts.mark_signed(org, created.id).await.unwrap();
        assert_eq!(signed.status, DocumentStatus::Signed);

        let err = contracts.mark_signed(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));
    }
}
