//! Repository for projects.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ensure_owned, repository::ScopedRepository};
use crate::db::models::projects::{
    ProjectCreateDBRequest, ProjectDBResponse, ProjectUpdateDBRequest,
};
use crate::types::{OrganizationId, ProjectId, abbrev_uuid};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::instrument;

const COLUMNS: &str = "id, organization_id, engagement_id, client_id, name, description, status, \
                       due_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProjectFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScopedRepository for Projects<'_> {
    type CreateRequest = ProjectCreateDBRequest;
    type UpdateRequest = ProjectUpdateDBRequest;
    type Response = ProjectDBResponse;
    type Id = ProjectId;
    type Filter = ProjectFilter;

    #[instrument(skip(self, request), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &ProjectCreateDBRequest,
    ) -> Result<ProjectDBResponse> {
        if let Some(engagement_id) = request.engagement_id {
            ensure_owned(self.db, "engagements", engagement_id, org).await?;
        }
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let project = sqlx::query_as::<_, ProjectDBResponse>(&format!(
            "INSERT INTO projects (organization_id, engagement_id, client_id, name, description, status, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(org)
        .bind(request.engagement_id)
        .bind(request.client_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.status)
        .bind(request.due_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(project)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), project_id = %abbrev_uuid(&id)),
        err
    )]
    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: ProjectId,
    ) -> Result<Option<ProjectDBResponse>> {
        let project = sqlx::query_as::<_, ProjectDBResponse>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id)
        .bind(org)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(project)
    }

    #[instrument(skip(self, filter), fields(org_id = %abbrev_uuid(&org)), err)]
    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectDBResponse>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM projects WHERE organization_id = "
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

        let projects = query
            .build_query_as::<ProjectDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;
        Ok(projects)
    }

    #[instrument(
        skip(self, request),
        fields(org_id = %abbrev_uuid(&org), project_id = %abbrev_uuid(&id)),
        err
    )]
    async fn update(
        &mut self,
        org: OrganizationId,
        id: ProjectId,
        request: &ProjectUpdateDBRequest,
    ) -> Result<ProjectDBResponse> {
        if let Some(engagement_id) = request.engagement_id {
            ensure_owned(self.db, "engagements", engagement_id, org).await?;
        }
        if let Some(client_id) = request.client_id {
            ensure_owned(self.db, "clients", client_id, org).await?;
        }
        let project = sqlx::query_as::<_, ProjectDBResponse>(&format!(
            "UPDATE projects SET \
                engagement_id = COALESCE($3, engagement_id), \
                client_id = COALESCE($4, client_id), \
                name = COALESCE($5, name), \
                description = COALESCE($6, description), \
                status = COALESCE($7, status), \
                due_date = COALESCE($8, due_date), \
                updated_at = now() \
             WHERE id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(org)
        .bind(request.engagement_id)
        .bind(request.client_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.status)
        .bind(request.due_date)
        .fetch_optional(&mut *self.db)
        .await?;
        project.ok_or(DbError::NotFound)
    }

    #[instrument(
        skip(self),
        fields(org_id = %abbrev_uuid(&org), project_id = %abbrev_uuid(&id)),
        err
    )]
    async fn delete(&mut self, org: OrganizationId, id: ProjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(org)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
