//! Domain services.
//!
//! Each service takes the store (and any other collaborator) explicitly plus
//! the caller's [`Scope`](chapterhouse_core::scope::Scope), enforces the
//! authorization rules, and returns [`CoreResult`](chapterhouse_core::error::CoreResult).
//! Handlers stay thin wrappers around these.

pub mod accounts;
pub mod bootstrap;
pub mod credentials;
pub mod identity;
pub mod invitations;
pub mod pitches;
pub mod retry;
pub mod reviews;
