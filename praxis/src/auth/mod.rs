//! Authentication and per-request tenancy context.
//!
//! Native email/password accounts with Argon2id hashing, JWT session tokens
//! carried in an HttpOnly cookie, and two axum extractors:
//!
//! - [`CurrentUser`](current_user::CurrentUser): verifies the session cookie
//!   and loads the user. Missing or invalid sessions reject with 401.
//! - [`OrgContext`](current_user::OrgContext): `CurrentUser` plus the
//!   caller's resolved organization id. Handlers that touch business data
//!   take this extractor, so every request carries its tenant scope
//!   explicitly instead of relying on shared session state. A user with no
//!   membership gets an organization lazily created on first use.

pub mod current_user;
pub mod password;
pub mod session;

pub use current_user::{CurrentUser, OrgContext};
