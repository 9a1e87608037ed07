//! API models for deals.

use super::pagination::Pagination;
use crate::db::models::deals::DealDBResponse;
use crate::types::{ClientId, DealId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pipeline stage of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DealCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    pub title: String,
    pub value: Option<Decimal>,
    /// Defaults to `lead`
    pub stage: Option<DealStage>,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DealUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    pub title: Option<String>,
    pub value: Option<Decimal>,
    pub stage: Option<DealStage>,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DealResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: DealId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    pub title: String,
    pub value: Option<Decimal>,
    pub stage: DealStage,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DealDBResponse> for DealResponse {
    fn from(db: DealDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            client_id: db.client_id,
            title: db.title,
            value: db.value,
            stage: db.stage,
            expected_close_date: db.expected_close_date,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListDealsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on title
    pub search: Option<String>,
}
