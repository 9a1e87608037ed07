//! Database models for vendors.

use crate::api::models::vendors::VendorCreate;
use crate::types::{OrganizationId, VendorId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct VendorCreateDBRequest {
    pub name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VendorDBResponse {
    pub id: VendorId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VendorCreate> for VendorCreateDBRequest {
    fn from(api: VendorCreate) -> Self {
        Self {
            name: api.name,
            contact_email: api.contact_email,
            notes: api.notes,
        }
    }
}
