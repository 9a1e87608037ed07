//! API models for client companies.

use super::pagination::Pagination;
use crate::db::models::clients::ClientDBResponse;
use crate::types::{ClientId, OrganizationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Payload for creating a client. Tenancy comes from the session; an
/// `organization_id` field in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientCreate {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ClientId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientDBResponse> for ClientResponse {
    fn from(db: ClientDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            name: db.name,
            industry: db.industry,
            website: db.website,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListClientsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on name
    pub search: Option<String>,
}
