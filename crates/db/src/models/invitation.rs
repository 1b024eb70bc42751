//! Invitation entity model and DTOs.

use chapterhouse_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `invitations` table.
///
/// Contains the redemption code -- only return it to admins.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Invitation {
    pub id: Uuid,
    /// Always lowercase.
    pub email: String,
    pub name: String,
    pub role: String,
    pub chapter: Option<String>,
    pub code: String,
    pub created_at: Timestamp,
    pub created_by: String,
    pub used: bool,
    pub used_at: Option<Timestamp>,
    pub registered_account_id: Option<String>,
}

/// DTO for issuing a new invitation.
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub email: String,
    pub name: String,
    pub role: String,
    pub chapter: Option<String>,
    pub code: String,
    pub created_by: String,
}
