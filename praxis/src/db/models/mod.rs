//! Row types exchanged with the database layer.
//!
//! `*CreateDBRequest` / `*UpdateDBRequest` are built from the API DTOs (the
//! conversions live here so handlers never hand raw JSON to a repository);
//! `*DBResponse` types derive `sqlx::FromRow` and mirror table columns.

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
pub mod users;
pub mod vendors;
