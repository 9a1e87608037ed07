//! Database models for deals.

use crate::api::models::deals::{DealCreate, DealStage, DealUpdate};
use crate::types::{ClientId, DealId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct DealCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub title: String,
    pub value: Option<Decimal>,
    pub stage: DealStage,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DealUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub title: Option<String>,
    pub value: Option<Decimal>,
    pub stage: Option<DealStage>,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DealDBResponse {
    pub id: DealId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub title: String,
    pub value: Option<Decimal>,
    pub stage: DealStage,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DealCreate> for DealCreateDBRequest {
    fn from(api: DealCreate) -> Self {
        Self {
            client_id: api.client_id,
            title: api.title,
            value: api.value,
            stage: api.stage.unwrap_or(DealStage::Lead),
            expected_close_date: api.expected_close_date,
            notes: api.notes,
        }
    }
}

impl From<DealUpdate> for DealUpdateDBRequest {
    fn from(api: DealUpdate) -> Self {
        Self {
            client_id: api.client_id,
            title: api.title,
            value: api.value,
            stage: api.stage,
            expected_close_date: api.expected_close_date,
            notes: api.notes,
        }
    }
}
