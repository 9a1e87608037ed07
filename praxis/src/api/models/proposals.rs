//! API models for proposals, plus the document lifecycle status shared with
//! contracts.

use super::pagination::Pagination;
use crate::db::models::proposals::ProposalDBResponse;
use crate::types::{ClientId, DealId, OrganizationId, ProposalId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Lifecycle of a proposal or contract: draft → sent → signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Signed,
}

/// New proposals always start in `draft`; status changes only through the
/// send/sign endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProposalCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub deal_id: Option<DealId>,
    pub title: String,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProposalUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub deal_id: Option<DealId>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProposalResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProposalId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
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

impl From<ProposalDBResponse> for ProposalResponse {
    fn from(db: ProposalDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            client_id: db.client_id,
            deal_id: db.deal_id,
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
pub struct ListProposalsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on title
    pub search: Option<String>,
}
