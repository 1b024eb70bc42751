//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create / upsert DTO for inserts
//! - An update DTO (all `Option` fields) where the entity is mutable

pub mod account;
pub mod invitation;
pub mod pitch;
pub mod review;
