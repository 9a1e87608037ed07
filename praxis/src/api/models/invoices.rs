//! API models for invoices.

use super::pagination::Pagination;
use crate::db::models::invoices::InvoiceDBResponse;
use crate::types::{ClientId, InvoiceId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Invoice lifecycle: draft → sent → paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

/// New invoices always start in `draft`; status changes only through the
/// send/mark-paid endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    pub number: String,
    pub amount: Decimal,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InvoiceUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<ClientId>,
    pub number: Option<String>,
    pub amount: Option<Decimal>,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: InvoiceId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
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

impl From<InvoiceDBResponse> for InvoiceResponse {
    fn from(db: InvoiceDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            client_id: db.client_id,
            number: db.number,
            amount: db.amount,
            status: db.status,
            issued_date: db.issued_date,
            due_date: db.due_date,
            sent_at: db.sent_at,
            paid_at: db.paid_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListInvoicesQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on invoice number
    pub search: Option<String>,
}
