//! Pitch entity model and DTOs.
//!
//! Pitches are created by the submission pipeline; this service only reads
//! them and flips `is_winner`.

use chapterhouse_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Pitch {
    pub id: String,
    pub founder_name: String,
    pub email: String,
    pub chapter: String,
    pub business_name: String,
    pub summary: Option<String>,
    pub video_url: Option<String>,
    pub is_winner: bool,
    pub created_at: Timestamp,
}

/// DTO used by the submission pipeline to file a pitch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePitch {
    pub id: String,
    pub founder_name: String,
    pub email: String,
    pub chapter: String,
    pub business_name: String,
    pub summary: Option<String>,
    pub video_url: Option<String>,
}
