//! Repository for the `reviews` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::review::{Review, UpsertReview};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reviewer_id, pitch_id, chapter, criterion_scores, overall_rating, \
                       comments, submitted_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Merge-upsert a review at its composite key.
    ///
    /// Uses `ON CONFLICT (id) DO UPDATE` so there is exactly one row per
    /// (reviewer, pitch); the last write wins.
    pub async fn upsert(pool: &PgPool, input: &UpsertReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (id, reviewer_id, pitch_id, chapter, criterion_scores, \
                                  overall_rating, comments, submitted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE \
             SET chapter = EXCLUDED.chapter, \
                 criterion_scores = EXCLUDED.criterion_scores, \
                 overall_rating = EXCLUDED.overall_rating, \
                 comments = EXCLUDED.comments, \
                 submitted_at = EXCLUDED.submitted_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(&input.id)
            .bind(&input.reviewer_id)
            .bind(&input.pitch_id)
            .bind(&input.chapter)
            .bind(Json(&input.criterion_scores))
            .bind(&input.overall_rating)
            .bind(&input.comments)
            .bind(input.submitted_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All reviews of one pitch, oldest first.
    pub async fn list_for_pitch(pool: &PgPool, pitch_id: &str) -> Result<Vec<Review>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE pitch_id = $1 ORDER BY submitted_at ASC");
        sqlx::query_as::<_, Review>(&query)
            .bind(pitch_id)
            .fetch_all(pool)
            .await
    }

    /// All reviews written by one reviewer, newest first.
    pub async fn list_by_reviewer(
        pool: &PgPool,
        reviewer_id: &str,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE reviewer_id = $1 ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(reviewer_id)
            .fetch_all(pool)
            .await
    }
}
