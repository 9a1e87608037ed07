//! Database models for client companies.

use crate::api::models::clients::{ClientCreate, ClientUpdate};
use crate::types::{ClientId, OrganizationId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ClientCreateDBRequest {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientUpdateDBRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientDBResponse {
    pub id: ClientId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientCreate> for ClientCreateDBRequest {
    fn from(api: ClientCreate) -> Self {
        Self {
            name: api.name,
            industry: api.industry,
            website: api.website,
            notes: api.notes,
        }
    }
}

impl From<ClientUpdate> for ClientUpdateDBRequest {
    fn from(api: ClientUpdate) -> Self {
        Self {
            name: api.name,
            industry: api.industry,
            website: api.website,
            notes: api.notes,
        }
    }
}
