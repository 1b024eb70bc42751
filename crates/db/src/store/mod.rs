//! The directory store: the one seam between the services and persistence.
//!
//! [`PgDirectoryStore`] delegates to the repositories; [`MemoryDirectoryStore`]
//! keeps everything in process for local development and tests. Both honour
//! the same invariants: one pending invitation per email, atomic account
//! provisioning, and upsert-by-key reviews.

use async_trait::async_trait;
use chapterhouse_core::error::CoreError;
use uuid::Uuid;

use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::pitch::{CreatePitch, Pitch};
use crate::models::review::{Review, UpsertReview};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDirectoryStore;
pub use postgres::PgDirectoryStore;

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed transiently.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint rejected the write.
    #[error("conflicting write: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// PostgreSQL unique violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(constraint);
            }
        }
        tracing::error!(error = %err, "Database error");
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
            StoreError::Conflict(what) => {
                CoreError::Validation(format!("Write rejected by constraint '{what}'"))
            }
        }
    }
}

/// Durable storage for accounts, invitations, pitches, and reviews.
///
/// Every `chapter: Option<&str>` parameter is a store-side filter; `None`
/// returns all chapters.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> StoreResult<()>;

    // --- Accounts ---

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>>;
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn find_accounts(&self, ids: &[String]) -> StoreResult<Vec<Account>>;
    async fn list_accounts(&self, chapter: Option<&str>) -> StoreResult<Vec<Account>>;
    async fn update_account(&self, id: &str, input: &UpdateAccount)
        -> StoreResult<Option<Account>>;
    /// Deletes the account and the invitation it consumed.
    async fn delete_account(&self, id: &str) -> StoreResult<bool>;

    // --- Invitations ---

    /// Fails with [`StoreError::Conflict`] if a pending invitation for the
    /// email already exists.
    async fn insert_invitation(&self, input: &CreateInvitation) -> StoreResult<Invitation>;
    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>>;
    async fn find_pending_invitation(&self, email: &str) -> StoreResult<Option<Invitation>>;
    async fn find_pending_invitation_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> StoreResult<Option<Invitation>>;
    async fn list_invitations(&self, chapter: Option<&str>) -> StoreResult<Vec<Invitation>>;
    async fn delete_invitation(&self, id: Uuid) -> StoreResult<bool>;

    /// Atomically create `input` and mark invitation `invitation_id` used by
    /// it. Returns `None` without writing if the invitation is no longer
    /// pending; fails with [`StoreError::Conflict`] if the account id or
    /// email is taken.
    async fn provision_account(
        &self,
        invitation_id: Uuid,
        input: &CreateAccount,
    ) -> StoreResult<Option<Account>>;

    // --- Pitches ---

    async fn insert_pitch(&self, input: &CreatePitch) -> StoreResult<Pitch>;
    async fn find_pitch(&self, id: &str) -> StoreResult<Option<Pitch>>;
    async fn list_pitches(&self, chapter: Option<&str>) -> StoreResult<Vec<Pitch>>;
    async fn set_pitch_winner(&self, id: &str, is_winner: bool) -> StoreResult<Option<Pitch>>;

    // --- Reviews ---

    /// Create or overwrite the review at `input.id`.
    async fn upsert_review(&self, input: &UpsertReview) -> StoreResult<Review>;
    async fn find_review(&self, id: &str) -> StoreResult<Option<Review>>;
    async fn list_reviews_for_pitch(&self, pitch_id: &str) -> StoreResult<Vec<Review>>;
    async fn list_reviews_by_reviewer(&self, reviewer_id: &str) -> StoreResult<Vec<Review>>;
}
