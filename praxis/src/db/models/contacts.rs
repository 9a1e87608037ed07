//! Database models for contacts.

use crate::api::models::contacts::{ContactCreate, ContactUpdate};
use crate::types::{ClientId, ContactId, OrganizationId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ContactCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactDBResponse {
    pub id: ContactId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactCreate> for ContactCreateDBRequest {
    fn from(api: ContactCreate) -> Self {
        Self {
            client_id: api.client_id,
            first_name: api.first_name,
            last_name: api.last_name,
            email: api.email,
            phone: api.phone,
            title: api.title,
        }
    }
}

impl From<ContactUpdate> for ContactUpdateDBRequest {
    fn from(api: ContactUpdate) -> Self {
        Self {
            client_id: api.client_id,
            first_name: api.first_name,
            last_name: api.last_name,
            email: api.email,
            phone: api.phone,
            title: api.title,
        }
    }
}
