//! Database models for invoices.

use crate::api::models::invoices::{InvoiceCreate, InvoiceStatus, InvoiceUpdate};
use crate::types::{ClientId, InvoiceId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct InvoiceCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub number: String,
    pub amount: Decimal,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdateDBRequest {
    pub client_id: Option<ClientId>,
    pub number: Option<String>,
    pub amount: Option<Decimal>,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceDBResponse {
    pub id: InvoiceId,
    pub organization_id: OrganizationId,
    pub client_id: Option<ClientId>,
    pub number: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub sent_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceCreate> for InvoiceCreateDBRequest {
    fn from(api: InvoiceCreate) -> Self {
        Self {
            client_id: api.client_id,
            number: api.number,
            amount: api.amount,
            issued_date: api.issued_date,
            due_date: api.due_date,
        }
    }
}

impl From<InvoiceUpdate> for InvoiceUpdateDBRequest {
    fn from(api: InvoiceUpdate) -> Self {
        Self {
            client_id: api.client_id,
            number: api.number,
            amount: api.amount,
            issued_date: api.issued_date,
            due_date: api.due_date,
        }
    }
}
