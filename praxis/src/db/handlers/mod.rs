//! Repository implementations, one per entity.
//!
//! All repositories wrap a `&mut PgConnection` and filter every query by
//! organization. The [`ScopedRepository`] trait fixes the CRUD signatures
//! for tenant-owned entities; entities with a narrower surface (vendors,
//! threads) expose inherent methods with the same scoping rules.

pub mod bills;
pub mod clients;
pub mod contacts;
pub mod contracts;
pub mod deals;
pub mod engagements;
pub mod invoices;
pub mod messages;
pub mod organizations;
pub mod projects;
pub mod proposals;
pub mod repository;
pub mod users;
pub mod vendors;

pub use bills::Bills;
pub use clients::Clients;
pub use contacts::Contacts;
pub use contracts::Contracts;
pub use deals::Deals;
pub use engagements::Engagements;
pub use invoices::Invoices;
pub use messages::{Messages, Threads};
pub use organizations::Organizations;
pub use projects::Projects;
pub use proposals::Proposals;
pub use repository::ScopedRepository;
pub use users::Users;
pub use vendors::Vendors;

use crate::db::errors::{DbError, Result};
use crate::types::OrganizationId;
use sqlx::PgConnection;
use uuid::Uuid;

/// Verify that a referenced row belongs to the caller's organization.
///
/// Used when a create/update payload references another entity (a contact's
/// client, a bill's vendor). A reference into a foreign tenant fails with
/// `DbError::NotFound`, indistinguishable from a dangling id.
pub(crate) async fn ensure_owned(
    conn: &mut PgConnection,
    table: &'static str,
    id: Uuid,
    org: OrganizationId,
) -> Result<()> {
    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND organization_id = $2)"
    ))
    .bind(id)
    .bind(org)
    .fetch_one(conn)
    .await?;
    if exists { Ok(()) } else { Err(DbError::NotFound) }
}
