//! Repository for the `accounts` table.

use sqlx::PgPool;

use crate::models::account::{Account, UpdateAccount};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, email, name, role, chapter, created_at, updated_at";

/// Provides read, update, and delete operations for accounts.
///
/// Accounts are only ever inserted together with the invitation they consume;
/// see [`InvitationRepo::consume_into_account`](super::InvitationRepo::consume_into_account).
pub struct AccountRepo;

impl AccountRepo {
    /// Find an account by its identity-provider subject id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every account whose id is in `ids`. Missing ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[String]) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = ANY($1)");
        sqlx::query_as::<_, Account>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List accounts, newest first, optionally restricted to one chapter.
    pub async fn list(pool: &PgPool, chapter: Option<&str>) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts
             WHERE ($1::TEXT IS NULL OR chapter = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(chapter)
            .fetch_all(pool)
            .await
    }

    /// Update an account. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                chapter = COALESCE($4, chapter),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.role.map(|r| r.as_str()))
            .bind(&input.chapter)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an account. The invitation it consumed is removed with it.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
