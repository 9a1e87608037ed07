//! Database models for engagements.

use crate::api::models::engagements::{EngagementCreate, EngagementStatus, EngagementUpdate};
use crate::types::{ClientId, ContractId, EngagementId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct EngagementCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub contract_id: Option<ContractId>,
    pub name: String,
    pub status: EngagementStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct EngagementUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub contract_id: Option<ContractId>,
    pub name: Option<String>,
    pub status: Option<EngagementStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EngagementDBResponse {
    pub id: EngagementId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub contract_id: Option<ContractId>,
    pub name: String,
    pub status: EngagementStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EngagementCreate> for EngagementCreateDBRequest {
    fn from(api: EngagementCreate) -> Self {
        Self {
            client_id: api.client_id,
            contract_id: api.contract_id,
            name: api.name,
            status: api.status.unwrap_or(EngagementStatus::Active),
            start_date: api.start_date,
            end_date: api.end_date,
        }
    }
}

impl From<EngagementUpdate> for EngagementUpdateDBRequest {
    fn from(api: EngagementUpdate) -> Self {
        Self {
            client_id: api.client_id,
            contract_id: api.contract_id,
            name: api.name,
            status: api.status,
            start_date: api.start_date,
            end_date: api.end_date,
        }
    }
}
