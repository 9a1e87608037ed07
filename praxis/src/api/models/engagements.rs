//! API models for engagements.

use super::pagination::Pagination;
use crate::db::models::engagements::EngagementDBResponse;
use crate::types::{ClientId, ContractId, EngagementId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "engagement_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub contract_id: Option<ContractId>,
    pub name: String,
    /// Defaults to `active`
    pub status: Option<EngagementStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EngagementUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub contract_id: Option<ContractId>,
    pub name: Option<String>,
    pub status: Option<EngagementStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: EngagementId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub contract_id: Option<ContractId>,
    pub name: String,
    pub status: EngagementStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EngagementDBResponse> for EngagementResponse {
    fn from(db: EngagementDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            client_id: db.client_id,
            contract_id: db.contract_id,
            name: db.name,
            status: db.status,
            start_date: db.start_date,
            end_date: db.end_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListEngagementsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on name
    pub search: Option<String>,
}
