//! Repository for client companies.
//!
//! The reference implementation of the org-scoped CRUD shape; the other
//! entity repositories follow the same layout.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::ScopedRepository;
use crate::db::models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientUpdateDBRequest};
use crate::types::{ClientId, OrganizationId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, name, industry, website, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ClientFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Clients<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Clients<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScopedRepository for Clients<'_> {
    type CreateRequest = ClientCreateDBRequest;
    type UpdateRequest = ClientUpdateDBRequest;
    type Response = ClientDBResponse;
    type Id = ClientId;
    type Filter = ClientFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &ClientCreateDBRequest,
    ) -> Result<ClientDBResponse> {
        let client = sqlx::query_as::<_, ClientDBResponse>(&format!(
            "INSERT INTO clients (organization_id, name, industry, website, notes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(&request.name)
        .bind(&request.industry)
        .bind(&request.website)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(client)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), client_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ClientId,
    ) -> Result<Option<ClientDBResponse>> {
        let client = sqlx::query_as::<_, ClientDBResponse>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(client)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ClientFilter,
    ) -> Result<Vec<ClientDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM clients WHERE organization_id = "
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

        let clients = query
            .build_query_as::<ClientDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(clients)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), client_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: ClientId,
        request: &ClientUpdateDBRequest,
    ) -> Result<ClientDBResponse> {
        let client = sqlx::query_as::<_, ClientDBResponse>(&format!(
            "UPDATE clients SET \
                name = COALESCE($3, name), \
                industry = COALESCE($4, industry), \
                website = COALESCE($5, website), \
                notes = COALESCE($6, notes), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(&request.name)
        .bind(&request.industry)
        .bind(&request.website)
        .bind(&request.notes)
        .fetch_optional(&mut *self.db)
        .await?;
        client.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), client_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: ClientId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND organization_id = $2")
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
    use crate::db::handlers::Organizations;
    use sqlx::PgPool;

    async fn make_org(conn: &mut PgConnection, name: &str) -> OrganizationId {
        Organizations::new(conn).create(name).await.unwrap().id
    }

    fn request(name: &str) -> ClientCreateDBRequest {
        ClientCreateDBRequest {
            name: name.to_string(),
            industry: Some("Consulting".to_string()),
            website: None,
            notes: None,
        }
    }

    fn filter() -> ClientFilter {
        ClientFilter {
            skip: 0,
            limit: 50,
            search: None,
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_create_stamps_organization(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = make_org(&mut conn, "Acme Advisory").await;

        let client = Clients::new(&mut conn)
            .create(org, &request("Globex"))
            .await
            .unwrap();
        assert_eq!(client.organization_id, org);
        assert_eq!(client.name, "Globex");
    }

    #[test_log::test(sqlx::test)]
    async fn test_cross_tenant_rows_are_invisible(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org_a = make_org(&mut conn, "Tenant A").await;
        let org_b = make_org(&mut conn, "Tenant B").await;

        let mut clients = Clients::new(&mut conn);
        let created = clients.create(org_a, &request("Initech")).await.unwrap();

        // visible from the owning tenant
        assert!(clients.get_by_id(org_a, created.id).await.unwrap().is_some());
        // a foreign tenant sees nothing, on every operation
        assert!(clients.get_by_id(org_b, created.id).await.unwrap().is_none());
        assert!(clients.list(org_b, &filter()).await.unwrap().is_empty());
        let err = clients
            .update(org_b, created.id, &ClientUpdateDBRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
        assert!(!clients.delete(org_b, created.id).await.unwrap());

        // and the row is untouched
        assert!(clients.get_by_id(org_a, created.id).await.unwrap().is_some());
    }

    #[test_log::test(sqlx::test)]
    async fn test_partial_update(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = make_org(&mut conn, "Acme Advisory").await;

        let mut clients = Clients::new(&mut conn);
        let created = clients.create(org, &request("Initrode")).await.unwrap();

        let updated = clients
            .update(
                org,
                created.id,
                &ClientUpdateDBRequest {
                    website: Some("https://initrode.example".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // untouched fields keep their values
        assert_eq!(updated.name, "Initrode");
        assert_eq!(updated.industry.as_deref(), Some("Consulting"));
        assert_eq!(updated.website.as_deref(), Some("https://initrode.example"));

        // all-None update is a no-op returning the current row
        let noop = clients
            .update(org, created.id, &ClientUpdateDBRequest::default())
            .await
            .unwrap();
        assert_eq!(noop.name, "Initrode");
    }

    #[test_log::test(sqlx::test)]
    async fn test_list_search_and_pagination(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = make_org(&mut conn, "Acme Advisory").await;

        let mut clients = Clients::new(&mut conn);
        for name in ["Alpha Corp", "Beta LLC", "Alphabet Soup"] {
            clients.create(org, &request(name)).await.unwrap();
        }

        let all = clients.list(org, &filter()).await.unwrap();
        assert_eq!(all.len(), 3);

        let matched = clients
            .list(
                org,
                &ClientFilter {
                    search: Some("alpha".to_string()),
                    ..filter()
                },
            )
            .await
            .unwrap();
        assert_eq!(matched.len(), 2);

        let page = clients
            .list(
                org,
                &ClientFilter {
                    skip: 1,
                    limit: 1,
                    search: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[test_log::test(sqlx::test)]
    async fn test_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let org = make_org(&mut conn, "Acme Advisory").await;

        let mut clients = Clients::new(&mut conn);
        let created = clients.create(org, &request("Ephemeral")).await.unwrap();
        assert!(clients.delete(org, created.id).await.unwrap());
        assert!(clients.get_by_id(org, created.id).await.unwrap().is_none());
        // second delete finds nothing
        assert!(!clients.delete(org, created.id).await.unwrap());
    }
}
