//! Repository for the `invitations` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::account_repo::COLUMNS as ACCOUNT_COLUMNS;
use crate::models::account::{Account, CreateAccount};
use crate::models::invitation::{CreateInvitation, Invitation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, role, chapter, code, created_at, created_by, \
                       used, used_at, registered_account_id";

/// Provides issue, lookup, consume, and delete operations for invitations.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Insert a new pending invitation with a v7 UUID.
    ///
    /// A second pending invitation for the same email violates
    /// `uq_invitations_pending_email`.
    pub async fn create(pool: &PgPool, input: &CreateInvitation) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO invitations (id, email, name, role, chapter, code, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.chapter)
            .bind(&input.code)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE id = $1");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the pending invitation for a lowercased email.
    pub async fn find_pending_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE email = $1 AND NOT used");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the pending invitation matching both a lowercased email and a code.
    pub async fn find_pending_by_code(
        pool: &PgPool,
        email: &str,
        code: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations WHERE email = $1 AND code = $2 AND NOT used"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(email)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List invitations, newest first, optionally restricted to one chapter.
    pub async fn list(pool: &PgPool, chapter: Option<&str>) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations
             WHERE ($1::TEXT IS NULL OR chapter = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(chapter)
            .fetch_all(pool)
            .await
    }

    /// Delete an invitation, used or not. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create an account and mark the invitation that authorised it as used,
    /// in one transaction.
    ///
    /// Returns `None` (and writes nothing) when the invitation is no longer
    /// pending. A duplicate account id or email surfaces as a unique
    /// violation and rolls the transaction back.
    pub async fn consume_into_account(
        pool: &PgPool,
        invitation_id: Uuid,
        input: &CreateAccount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let pending: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM invitations WHERE id = $1 AND NOT used FOR UPDATE")
                .bind(invitation_id)
                .fetch_optional(&mut *tx)
                .await?;
        if pending.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO accounts (id, email, name, role, chapter)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(&input.id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(input.role.as_str())
            .bind(&input.chapter)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE invitations SET
                used = TRUE,
                used_at = NOW(),
                registered_account_id = $2
             WHERE id = $1",
        )
        .bind(invitation_id)
        .bind(&account.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(account))
    }
}
