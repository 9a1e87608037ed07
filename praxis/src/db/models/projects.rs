//! Database models for projects.

use crate::api::models::projects::{ProjectCreate, ProjectStatus, ProjectUpdate};
use crate::types::{ClientId, EngagementId, OrganizationId, ProjectId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct ProjectCreateDBRequest {
    pub engagement_id: Option<EngagementId>,
    pub client_id: Option<ClientId>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdateDBRequest {
    pub engagement_id: Option<EngagementId>,
    pub client_id: Option<ClientId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectDBResponse {
    pub id: ProjectId,
    pub organization_id: OrganizationId,
    pub engagement_id: Option<EngagementId>,
    pub client_id: Option<ClientId>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectCreate> for ProjectCreateDBRequest {
    fn from(api: ProjectCreate) -> Self {
        Self {
            engagement_id: api.engagement_id,
            client_id: api.client_id,
            name: api.name,
            description: api.description,
            status: api.status.unwrap_or(ProjectStatus::Planned),
            due_date: api.due_date,
        }
    }
}

impl From<ProjectUpdate> for ProjectUpdateDBRequest {
    fn from(api: ProjectUpdate) -> Self {
        Self {
            engagement_id: api.engagement_id,
            client_id: api.client_id,
            name: api.name,
            description: api.description,
            status: api.status,
            due_date: api.due_date,
        }
    }
}
