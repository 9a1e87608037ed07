//! Database layer.
//!
//! ```text
//!   api/handlers ──► db/handlers (repositories) ──► Postgres
//!        │                  │
//!        ▼                  ▼
//!   api/models ◄──── db/models (row types)
//! ```
//!
//! Repositories borrow a `&mut PgConnection` so callers decide whether work
//! happens on a pooled connection or inside a transaction. Every repository
//! method on business data takes an `OrganizationId`; there is no way to
//! query tenant data without naming the tenant.

pub mod errors;
pub mod handlers;
pub mod models;
