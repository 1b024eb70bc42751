//! [`DirectoryStore`] backed by PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use super::{DirectoryStore, StoreResult};
use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::pitch::{CreatePitch, Pitch};
use crate::models::review::{Review, UpsertReview};
use crate::repositories::{AccountRepo, InvitationRepo, PitchRepo, ReviewRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgDirectoryStore {
    pool: DbPool,
}

impl PgDirectoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_accounts(&self, ids: &[String]) -> StoreResult<Vec<Account>> {
        Ok(AccountRepo::find_many(&self.pool, ids).await?)
    }

    async fn list_accounts(&self, chapter: Option<&str>) -> StoreResult<Vec<Account>> {
        Ok(AccountRepo::list(&self.pool, chapter).await?)
    }

    async fn update_account(
        &self,
        id: &str,
        input: &UpdateAccount,
    ) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_account(&self, id: &str) -> StoreResult<bool> {
        Ok(AccountRepo::delete(&self.pool, id).await?)
    }

    async fn insert_invitation(&self, input: &CreateInvitation) -> StoreResult<Invitation> {
        Ok(InvitationRepo::create(&self.pool, input).await?)
    }

    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>> {
        Ok(InvitationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_pending_invitation(&self, email: &str) -> StoreResult<Option<Invitation>> {
        Ok(InvitationRepo::find_pending_by_email(&self.pool, email).await?)
    }

    async fn find_pending_invitation_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> StoreResult<Option<Invitation>> {
        Ok(InvitationRepo::find_pending_by_code(&self.pool, email, code).await?)
    }

    async fn list_invitations(&self, chapter: Option<&str>) -> StoreResult<Vec<Invitation>> {
        Ok(InvitationRepo::list(&self.pool, chapter).await?)
    }

    async fn delete_invitation(&self, id: Uuid) -> StoreResult<bool> {
        Ok(InvitationRepo::delete(&self.pool, id).await?)
    }

    async fn provision_account(
        &self,
        invitation_id: Uuid,
        input: &CreateAccount,
    ) -> StoreResult<Option<Account>> {
        Ok(InvitationRepo::consume_into_account(&self.pool, invitation_id, input).await?)
    }

    async fn insert_pitch(&self, input: &CreatePitch) -> StoreResult<Pitch> {
        Ok(PitchRepo::create(&self.pool, input).await?)
    }

    async fn find_pitch(&self, id: &str) -> StoreResult<Option<Pitch>> {
        Ok(PitchRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_pitches(&self, chapter: Option<&str>) -> StoreResult<Vec<Pitch>> {
        Ok(PitchRepo::list(&self.pool, chapter).await?)
    }

    async fn set_pitch_winner(&self, id: &str, is_winner: bool) -> StoreResult<Option<Pitch>> {
        Ok(PitchRepo::set_winner(&self.pool, id, is_winner).await?)
    }

    async fn upsert_review(&self, input: &UpsertReview) -> StoreResult<Review> {
        Ok(ReviewRepo::upsert(&self.pool, input).await?)
    }

    async fn find_review(&self, id: &str) -> StoreResult<Option<Review>> {
        Ok(ReviewRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_reviews_for_pitch(&self, pitch_id: &str) -> StoreResult<Vec<Review>> {
        Ok(ReviewRepo::list_for_pitch(&self.pool, pitch_id).await?)
    }

    async fn list_reviews_by_reviewer(&self, reviewer_id: &str) -> StoreResult<Vec<Review>> {
        Ok(ReviewRepo::list_by_reviewer(&self.pool, reviewer_id).await?)
    }
}
