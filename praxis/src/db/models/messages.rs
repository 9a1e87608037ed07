//! Database models for message threads and messages.

use crate::api::models::threads::ThreadCreate;
use crate::types::{ClientId, MessageId, OrganizationId, ThreadId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ThreadCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub subject: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThreadDBResponse {
    pub id: ThreadId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub subject: String,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageDBResponse {
    pub id: MessageId,
    pub organization_id: OrganizationId,
    pub thread_id: ThreadId,
    pub sender_id: Option<UserId>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<ThreadCreate> for ThreadCreateDBRequest {
    fn from(api: ThreadCreate) -> Self {
        Self {
            client_id: api.client_id,
            subject: api.subject,
        }
    }
}
