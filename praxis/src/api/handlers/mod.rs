//! Request handlers, one module per domain.
//!
//! The per-domain modules are deliberately uniform and repetitive: each one
//! is a flat set of small handlers that can be read and tested on its own,
//! rather than a generic CRUD abstraction. Every handler that touches
//! business data takes the [`OrgContext`](crate::auth::OrgContext)
//! extractor, which carries the tenant scope.

pub mod auth;
pub mod bills;
pub mod clients;
pub mod contacts;
pub mod contracts;
pub mod deals;
pub mod engagements;
pub mod invoices;
pub mod projects;
pub mod proposals;
pub mod threads;
pub mod vendors;
