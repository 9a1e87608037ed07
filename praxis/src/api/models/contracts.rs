//! API models for contracts.

use super::pagination::Pagination;
use super::proposals::DocumentStatus;
use crate::db::models::contracts::ContractDBResponse;
use crate::types::{ClientId, ContractId, OrganizationId, ProposalId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub proposal_id: Option<ProposalId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContractUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub proposal_id: Option<ProposalId>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ContractId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
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

impl From<ContractDBResponse> for ContractResponse {
    fn from(db: ContractDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            client_id: db.client_id,
            proposal_id: db.proposal_id,
            title: db.title,
            body: db.body,
            amount: db.amount,
            status: db.status,
            sent_at: db.sent_at,
            signed_at: db.signed_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListContractsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on title
    pub search: Option<String>,
}
