//! Domain rules for the chapter review platform.
//!
//! This crate has no I/O. It holds the role model, the authorization guard,
//! invitation and review validation, and the review aggregator so that the
//! store and API layers share one definition of every rule.

pub mod aggregation;
pub mod error;
pub mod identity;
pub mod invitation;
pub mod review;
pub mod roles;
pub mod scope;
pub mod types;
