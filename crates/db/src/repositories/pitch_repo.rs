//! Repository for the `pitches` table.

use sqlx::PgPool;

use crate::models::pitch::{CreatePitch, Pitch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, founder_name, email, chapter, business_name, summary, video_url, \
                       is_winner, created_at";

pub struct PitchRepo;

impl PitchRepo {
    /// Insert a pitch from the submission pipeline.
    pub async fn create(pool: &PgPool, input: &CreatePitch) -> Result<Pitch, sqlx::Error> {
        let query = format!(
            "INSERT INTO pitches (id, founder_name, email, chapter, business_name, summary, video_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pitch>(&query)
            .bind(&input.id)
            .bind(&input.founder_name)
            .bind(&input.email)
            .bind(&input.chapter)
            .bind(&input.business_name)
            .bind(&input.summary)
            .bind(&input.video_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Pitch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pitches WHERE id = $1");
        sqlx::query_as::<_, Pitch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List pitches, newest first, optionally restricted to one chapter.
    pub async fn list(pool: &PgPool, chapter: Option<&str>) -> Result<Vec<Pitch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pitches
             WHERE ($1::TEXT IS NULL OR chapter = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Pitch>(&query)
            .bind(chapter)
            .fetch_all(pool)
            .await
    }

    /// Set the winner flag. Returns `None` if the pitch does not exist.
    pub async fn set_winner(
        pool: &PgPool,
        id: &str,
        is_winner: bool,
    ) -> Result<Option<Pitch>, sqlx::Error> {
        let query = format!("UPDATE pitches SET is_winner = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Pitch>(&query)
            .bind(id)
            .bind(is_winner)
            .fetch_optional(pool)
            .await
    }
}
