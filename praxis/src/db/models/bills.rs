//! Database models for bills payable.

use crate::api::models::bills::{BillCreate, BillStatus, BillUpdate};
use crate::types::{BillId, OrganizationId, VendorId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct BillCreateDBRequest {
    pub vendor_id: Option<VendorId>,
    pub reference: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct BillUpdateDBRequest {
    pub vendor_id: Option<VendorId>,
    pub reference: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillDBResponse {
    pub id: BillId,
    pub organization_id: OrganizationId,
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

impl From<BillCreate> for BillCreateDBRequest {
    fn from(api: BillCreate) -> Self {
        Self {
            vendor_id: api.vendor_id,
            reference: api.reference,
            amount: api.amount,
            due_date: api.due_date,
        }
    }
}

impl From<BillUpdate> for BillUpdateDBRequest {
    fn from(api: BillUpdate) -> Self {
        Self {
            vendor_id: api.vendor_id,
            reference: api.reference,
            amount: api.amount,
            due_date: api.due_date,
        }
    }
}
