//! Database models for contracts.

use crate::api::models::contracts::{ContractCreate, ContractUpdate};
use crate::api::models::proposals::DocumentStatus;
use crate::types::{ClientId, ContractId, OrganizationId, ProposalId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct ContractCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub proposal_id: Option<ProposalId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct ContractUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub proposal_id: Option<ProposalId>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContractDBResponse {
    pub id: ContractId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub proposal_id: Option<ProposalId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
    pub status: DocumentStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContractCreate> for ContractCreateDBRequest {
    fn from(api: ContractCreate) -> Self {
        Self {
            client_id: api.client_id,
            proposal_id: api.proposal_id,
            title: api.title,
            body: api.body,
            amount: api.amount,
        }
    }
}

impl From<ContractUpdate> for ContractUpdateDBRequest {
    fn from(api: ContractUpdate) -> Self {
        Self {
            client_id: api.client_id,
            proposal_id: api.proposal_id,
            title: api.title,
            body: api.body,
            amount: api.amount,
        }
    }
}
