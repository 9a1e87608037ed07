//! Repository for organizations and memberships.

use crate::db::errors::Result;
use crate::db::models::organizations::{
    MemberRole, MembershipDBResponse, OrganizationDBResponse,
};
use crate::types::{OrganizationId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Organizations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Organizations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn create(&mut self, name: &str) -> Result<OrganizationDBResponse> {
        let org = sqlx::query_as::<_, OrganizationDBResponse>(
            "INSERT INTO organizations (name) VALUES ($1) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(org)
    }

    #[instrument(skip(self), fields(org_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: OrganizationId) -> Result<Option<OrganizationDBResponse>> {
        let org = sqlx::query_as::<_, OrganizationDBResponse>(
            "SELECT id, name, created_at, updated_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(org)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), user_id = %abbrev_uuid(&user)),
        err
    )]
    pub async fn add_member(
        &mut self,
        org: OrganizationId,
        user: UserId,
        role: MemberRole,
    ) -> Result<MembershipDBResponse> {
        let membership = sqlx::query_as::<_, MembershipDBResponse>(
            r#"
            INSERT INTO organization_members (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (organization_id, user_id) DO UPDATE SET role = EXCLUDED.role
            RETURNING organization_id, user_id, role, created_at
            "#,
        )
        .bind(org)
        .bind(user)
        .bind(role)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(membership)
    }

    /// Resolve the organization a user acts under, creating one when the
    /// user has no membership yet. The oldest membership wins for users who
    /// belong to several organizations.
    ///
    /// Callers run this inside a transaction so the create-org + add-member
    /// pair is atomic.
    #[instrument(skip(self, display_name), fields(user_id = %abbrev_uuid(&user)), err)]
    pub async fn resolve_for_user(
        &mut self,
        user: UserId,
        display_name: &str,
    ) -> Result<OrganizationId> {
        let existing = sqlx::query_scalar::<_, OrganizationId>(
            "SELECT organization_id FROM organization_members \
             WHERE user_id = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(user)
        .fetch_optional(&mut *self.db)
        .await?;

        if let Some(org_id) = existing {
            return Ok(org_id);
        }

        let org = self.create(&format!("{display_name}'s workspace")).await?;
        self.add_member(org.id, user, MemberRole::Owner).await?;
        tracing::info!(org_id = %abbrev_uuid(&org.id), "created organization for first-time user");
        Ok(org.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Users;
    use crate::db::models::users::UserCreateDBRequest;
    use sqlx::PgPool;

    async fn make_user(conn: &mut PgConnection, email: &str) -> UserId {
        Users::new(conn)
            .create(&UserCreateDBRequest {
                email: email.to_string(),
                password_hash: "$argon2id$fake".to_string(),
                display_name: "Org Tester".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[test_log::test(sqlx::test)]
    async fn test_resolve_creates_org_once(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let user = make_user(&mut conn, "first@example.com").await;

        let mut orgs = Organizations::new(&mut conn);
        let first = orgs.resolve_for_user(user, "Org Tester").await.unwrap();
        let second = orgs.resolve_for_user(user, "Org Tester").await.unwrap();
        assert_eq!(first, second);

        let org = orgs.get_by_id(first).await.unwrap().unwrap();
        assert_eq!(org.name, "Org Tester's workspace");
    }

    #[test_log::test(sqlx::test)]
    async fn test_oldest_membership_wins(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let user = make_user(&mut conn, "multi@example.com").await;

        let mut orgs = Organizations::new(&mut conn);
        let first = orgs.create("First Org").await.unwrap();
        orgs.add_member(first.id, user, MemberRole::Owner).await.unwrap();
        let second = orgs.create("Second Org").await.unwrap();
        orgs.add_member(second.id, user, MemberRole::Member).await.unwrap();

        let resolved = orgs.resolve_for_user(user, "ignored").await.unwrap();
        assert_eq!(resolved, first.id);
    }
}
