//! Review entity model and DTOs.

use std::collections::BTreeMap;

use chapterhouse_core::aggregation::RatedReview;
use chapterhouse_core::types::Timestamp;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full row from the `reviews` table. `id` is `reviewer_id:pitch_id`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Review {
    pub id: String,
    pub reviewer_id: String,
    pub pitch_id: String,
    pub chapter: String,
    pub criterion_scores: Json<BTreeMap<String, i16>>,
    pub overall_rating: Option<String>,
    pub comments: Option<String>,
    pub submitted_at: Timestamp,
}

impl RatedReview for Review {
    fn pitch_id(&self) -> &str {
        &self.pitch_id
    }

    fn reviewer_id(&self) -> &str {
        &self.reviewer_id
    }

    fn overall_rating(&self) -> Option<&str> {
        self.overall_rating.as_deref()
    }
}

/// DTO for the merge-upsert at `id`. Every field overwrites the stored row.
#[derive(Debug, Clone)]
pub struct UpsertReview {
    pub id: String,
    pub reviewer_id: String,
    pub pitch_id: String,
    pub chapter: String,
    pub criterion_scores: BTreeMap<String, i16>,
    pub overall_rating: Option<String>,
    pub comments: Option<String>,
    pub submitted_at: Timestamp,
}
