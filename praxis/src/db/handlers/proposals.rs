//! Repository for proposals, including the draft → sent → signed lifecycle.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::proposals::{
    ProposalCreateDBRequest, ProposalDBResponse, ProposalUpdateDBRequest,
};
use crate::types::{OrganizationId, ProposalId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, client_id, deal_id, title, body, amount, status, \
                       sent_at, signed_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProposalFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Proposals<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Proposals<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    async fn exists(&mut self, org: OrganizationId, id: ProposalId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM proposals WHERE id = $1 AND organization_id = $2)",
        )
        .bind(id)
        .bind(org)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(exists)
    }

    /// Guarded transition: updates the row only when it is in `from` status.
    /// A wrong-state row yields `InvalidState`; a missing or cross-tenant
    /// row yields `NotFound`.
    async fn transition(
        &mut self,
        org: OrganizationId,
        id: ProposalId,
        from: &str,
        set_clause: &str,
    ) -> Result<ProposalDBResponse> {
        let updated = sqlx::query_as::<_, ProposalDBResponse>(&format!(
            "UPDATE proposals SET {set_clause}, updated_at = now() \
             WHERE id = $1 AND organization_id = $2 AND status = '{from}' \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        match updated {
            Some(proposal) => Ok(proposal),
            None if self.exists(org, id).await? => Err(DbError::InvalidState(format!(
                "proposal is not in {from} status"
            ))),
            None => Err(DbError::NotFound),
        }
    }

    /// draft → sent, stamping `sent_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), proposal_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_sent(
        &mut self,
        org: OrganizationId,
        id: ProposalId,
    ) -> Result<ProposalDBResponse> {
        self.transition(org, id, "draft", "status = 'sent', sent_at = now()")
            .await
    }

    /// sent → signed, stamping `signed_at`.
    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), proposal_id = %abbrev_uuid(&id)),
        err
    )]
    pub async fn mark_signed(
        &mut self,
        org: OrganizationId,
        id: ProposalId,
    ) -> Result<ProposalDBResponse> {
        self.transition(org, id, "sent", "status = 'signed', signed_at = now()")
            .await
    }
}

#[async_trait]
impl ScopedRepository for Proposals<'_> {
    type CreateRequest = ProposalCreateDBRequest;
    type UpdateRequest = ProposalUpdateDBRequest;
    type Response = ProposalDBResponse;
    type Id = ProposalId;
    type Filter = ProposalFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &ProposalCreateDBRequest,
    ) -> Result<ProposalDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(deal_id) = request.deal_id {
            ensure_owned(self.db, "deals", deal_id, org).await?;
        }
        let proposal = sqlx::query_as::<_, ProposalDBResponse>(&format!(
            "INSERT INTO proposals (organization_id, client_id, deal_id, title, body, amount) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(request.deal_id)
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.amount)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(proposal)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), proposal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ProposalId,
    ) -> Result<Option<ProposalDBResponse>> {
        let proposal = sqlx::query_as::<_, ProposalDBResponse>(&format!(
            "SELECT {COLUMNS} FROM proposals WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(proposal)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ProposalFilter,
    ) -> Result<Vec<ProposalDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM proposals WHERE organization_id = "
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

        let proposals = query
            .build_query_as::<ProposalDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(proposals)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), proposal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: ProposalId,
        request: &ProposalUpdateDBRequest,
    ) -> Result<ProposalDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        if let Some(deal_id) = request.deal_id {
            ensure_owned(self.db, "deals", deal_id, org).await?;
        }
        let proposal = sqlx::query_as::<_, ProposalDBResponse>(&format!(
            "UPDATE proposals SET \
                client_id = COALESCE($3, client_id), \
                deal_id = COALESCE($4, deal_id), \
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
        .bind(request.deal_id)
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.amount)
        .fetch_optional(&mut *self.db)
        .await?;
        proposal.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), proposal_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: ProposalId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM proposals WHERE id = $1 AND organization_id = $2")
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

    fn request(title: &str) -> ProposalCreateDBRequest {
        ProposalCreateDBRequest {
            client_id: None,
            deal_id: None,
            title: title.to_string(),
            body: Some("Scope of work...".to_string()),
            amount: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_lifecycle(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = Organizations::new(&mut conn).create("A").await.unwrap().id;

        let mut proposals = Proposals::new(&mut conn);
        let created = proposals.create(org, &request("Q3 retainer")).await.unwrap();
        assert_eq!(created.status, DocumentStatus::Draft);
        assert!(created.sent_at.is_none());

        // cannot sign a draft
        let err = proposals.mark_signed(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let sent = proposals.mark_sent(org, created.id).await.unwrap();
        assert_eq!(sent.status, DocumentStatus::Sent);
        assert!(sent.sent_at.is_some());

        // cannot send twice
        let err = proposals.mark_sent(org, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let signed = proposals.mark_signed(org, created.id).await.unwrap();
        assert_eq!(signed.status, DocumentStatus::Signed);
        assert!(signed.signed_at.is_some());
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_transition_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut proposals = Proposals::new(&mut conn);
        let created = proposals.create(org_a, &request("Private")).await.unwrap();

        // the foreign tenant cannot tell a wrong-state row from a missing one
        let err = proposals.mark_sent(org_b, created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
