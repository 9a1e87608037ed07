//! API request/response models.
//!
//! Create payloads never carry an organization id that the server honors;
//! tenancy always comes from the request's resolved `OrgContext`. Unknown
//! fields in payloads (including a client-supplied `organization_id`) are
//! ignored on deserialization.

pub mod auth;
pub mod bills;
pub mod clients;
pub mod contacts;
pub mod contracts;
pub mod deals;
pub mod engagements;
pub mod invoices;
pub mod pagination;
pub mod projects;
pub mod proposals;
pub mod threads;
pub mod vendors;
