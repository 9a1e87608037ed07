//! API models for bills payable.

use super::pagination::Pagination;
use crate::db::models::bills::BillDBResponse;
use crate::types::{BillId, OrganizationId, VendorId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Bill lifecycle: pending → approved → paid, or pending → rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bill_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillCreate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub vendor_id: Option<VendorId>,
    pub reference: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BillUpdate {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub vendor_id: Option<VendorId>,
    pub reference: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: BillId,
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: OrganizationId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub vendor_id: Option<VendorId>,
    pub reference: String,
    pub amount: Decimal,
    pub status: BillStatus,
    pub due_date: Option<NaiveDate>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BillDBResponse> for BillResponse {
    fn from(db: BillDBResponse) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            vendor_id: db.vendor_id,
            reference: db.reference,
            amount: db.amount,
            status: db.status,
            due_date: db.due_date,
            approved_at: db.approved_at,
            paid_at: db.paid_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListBillsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Case-insensitive substring match on reference
    pub search: Option<String>,
}
