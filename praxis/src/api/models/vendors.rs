//! API models for vendors.

use super::pagination::Pagination;
use crate::db::models::vendors::VendorDBResponse;
use crate::types::{OrganizationId, VendorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorCreate {
    pub name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: VendorId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    pub name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VendorDBResponse> for VendorResponse {
    fn from(db: VendorDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            name: db.name,
            contact_email: db.contact_email,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListVendorsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on name
    pub search: Option<String>,
}
