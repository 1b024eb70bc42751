//! Authentication and authorization extractors.
//!
//! - [`auth::AuthPrincipal`] -- The principal from a bearer token; no account
//!   lookup.
//! - [`auth::CurrentAccount`] -- The caller's stored account and derived scope.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` or `superAdmin` role.

pub mod auth;
pub mod rbac;
