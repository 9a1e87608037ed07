//! The organization-scoped repository contract.

use crate::db::errors::Result;
use crate::types::OrganizationId;

/// Uniform CRUD surface for tenant-owned entities.
///
/// Every method takes the caller's `OrganizationId` alongside the row id, so
/// the tenant filter is part of the signature rather than a convention each
/// query has to remember. A row that exists under another organization is
/// indistinguishable from a missing row: `get_by_id` returns `None`,
/// `update` fails with `DbError::NotFound`, `delete` returns `false`.
#[async_trait::async_trait]
pub trait ScopedRepository {
    type CreateRequest: Send + Sync;
    type UpdateRequest: Send + Sync;
    type Response: Send + Sync;
    type Id: Send + Sync;
    type Filter: Send + Sync;

    /// Insert a row, stamping `organization_id` from the context. Any
    /// organization id present in the request payload is ignored upstream.
    async fn create(
        &mut self,
        org: OrganizationId,
        request: &Self::CreateRequest,
    ) -> Result<Self::Response>;

    async fn get_by_id(
        &mut self,
        org: OrganizationId,
        id: Self::Id,
    ) -> Result<Option<Self::Response>>;

    async fn list(
        &mut self,
        org: OrganizationId,
        filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>>;

    /// Partial update; `None` fields keep their current value. Fails with
    /// `DbError::NotFound` when `(id, org)` match no row.
    async fn update(
        &mut self,
        org: OrganizationId,
        id: Self::Id,
        request: &Self::UpdateRequest,
    ) -> Result<Self::Response>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&mut self, org: OrganizationId, id: Self::Id) -> Result<bool>;
}
