//! Database models for proposals.

use crate::api::models::proposals::{DocumentStatus, ProposalCreate, ProposalUpdate};
use crate::types::{ClientId, DealId, OrganizationId, ProposalId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct ProposalCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub deal_id: Option<DealId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct ProposalUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub deal_id: Option<DealId>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProposalDBResponse {
    pub id: ProposalId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub deal_id: Option<DealId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
    pub status: DocumentStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProposalCreate> for ProposalCreateDBRequest {
    fn from(api: ProposalCreate) -> Self {
        Self {
            client_id: api.client_id,
            deal_id: api.deal_id,
            title: api.title,
            body: api.body,
            amount: api.amount,
        }
    }
}

impl From<ProposalUpdate> for ProposalUpdateDBRequest {
    fn from(api: ProposalUpdate) -> Self {
        Self {
            client_id: api.client_id,
            deal_id: api.deal_id,
            title: api.title,
            body: api.body,
            amount: api.amount,
        }
    }
}
