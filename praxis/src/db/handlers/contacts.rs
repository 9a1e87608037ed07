//! Repository for contacts.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::contacts::{
    ContactCreateDBRequest, ContactDBResponse, ContactUpdateDBRequest,
};
use crate::types::{ContactId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str =
    "id, organization_id, client_id, first_name, last_name, email, phone, title, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ContactFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Contacts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Contacts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScopedRepository for Contacts<'_> {
    type CreateRequest = ContactCreateDBRequest;
    type UpdateRequest = ContactUpdateDBRequest;
    type Response = ContactDBResponse;
    type Id = ContactId;
    type Filter = ContactFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &ContactCreateDBRequest,
    ) -> Result<ContactDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let contact = sqlx::query_as::<_, ContactDBResponse>(&format!(
            "INSERT INTO contacts (organization_id, client_id, first_name, last_name, email, phone, title) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.client_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.title)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(contact)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contact_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ContactId,
    ) -> Result<Option<ContactDBResponse>> {
        let contact = sqlx::query_as::<_, ContactDBResponse>(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(contact)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ContactFilter,
    ) -> Result<Vec<ContactDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM contacts WHERE organization_id = "
        ));
        query.push_bind(org);
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query.push(" AND (first_name ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR last_name ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR email ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let contacts = query
            .build_query_as::<ContactDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(contacts)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), contact_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: ContactId,
        request: &ContactUpdateDBRequest,
    ) -> Result<ContactDBResponse> {
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let contact = sqlx::query_as::<_, ContactDBResponse>(&format!(
            "UPDATE contacts SET \
                client_id = COALESCE($3, client_id), \
                first_name = COALESCE($4, first_name), \
                last_name = COALESCE($5, last_name), \
                email = COALESCE($6, email), \
                phone = COALESCE($7, phone), \
                title = COALESCE($8, title), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.client_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.title)
        .fetch_optional(&mut *self.db)
        .await?;
        contact.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), contact_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: ContactId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND organization_id = $2")
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
    use crate::db::handlers::{Clients, Organizations};
    use crate::db::models::clients::ClientCreateDBRequest;
    use sqlx::PgPool;

    fn request(first: &str, last: &str) -> ContactCreateDBRequest {
        ContactCreateDBRequest {
            client_id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
            title: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_org_scoping(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let mut contacts = Contacts::new(&mut conn);
        let created = contacts.create(org_a, &request("Ada", "Lovelace")).await.unwrap();
        assert_eq!(created.organization_id, org_a);

        assert!(contacts.get_by_id(org_b, created.id).await.unwrap().is_none());
        assert!(!contacts.delete(org_b, created.id).await.unwrap());
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_client_reference_rejected(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = Organizations::new(&mut conn).create("A").await.unwrap().id;
        let org_b = Organizations::new(&mut conn).create("B").await.unwrap().id;

        let foreign_client = Clients::new(&mut conn)
            .create(
                org_b,
                &ClientCreateDBRequest {
                    name: "Foreign".to_string(),
                    industry: None,
                    website: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let err = Contacts::new(&mut conn)
            .create(
                org_a,
                &ContactCreateDBRequest {
                    client_id: Some(foreign_client.id),
                    ..request("Grace", "Hopper")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
