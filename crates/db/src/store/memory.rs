//! In-process [`DirectoryStore`] for local development and tests.
//!
//! All tables live behind one `RwLock`, so every check-then-write sequence
//! (pending-invitation uniqueness, account provisioning) runs under a single
//! write guard and is atomic with respect to other callers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DirectoryStore, StoreError, StoreResult};
use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::invitation::{CreateInvitation, Invitation};
use crate::models::pitch::{CreatePitch, Pitch};
use crate::models::review::{Review, UpsertReview};

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    invitations: HashMap<Uuid, Invitation>,
    pitches: HashMap<String, Pitch>,
    reviews: HashMap<String, Review>,
}

#[derive(Default)]
pub struct MemoryDirectoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
    failures_pending: AtomicUsize,
}

impl MemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every operation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail the next `count` write operations with [`StoreError::Unavailable`].
    /// Reads are unaffected.
    pub fn fail_next_writes(&self, count: usize) {
        self.failures_pending.store(count, Ordering::SeqCst);
    }

    /// Insert an account row as-is, bypassing invitation checks. Fixture data
    /// only; a stored role is not validated.
    pub async fn seed_account(&self, account: Account) {
        self.tables
            .write()
            .await
            .accounts
            .insert(account.id.clone(), account);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn check_writable(&self) -> StoreResult<()> {
        self.check_available()?;
        let consumed = self
            .failures_pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            return Err(StoreError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

fn chapter_matches(chapter: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => chapter == Some(f),
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>> {
        self.check_available()?;
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_accounts(&self, ids: &[String]) -> StoreResult<Vec<Account>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.accounts.get(id).cloned())
            .collect())
    }

    async fn list_accounts(&self, chapter: Option<&str>) -> StoreResult<Vec<Account>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Account> = tables
            .accounts
            .values()
            .filter(|a| chapter_matches(a.chapter.as_deref(), chapter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update_account(
        &self,
        id: &str,
        input: &UpdateAccount,
    ) -> StoreResult<Option<Account>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let Some(account) = tables.accounts.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            account.name = name.clone();
        }
        if let Some(role) = input.role {
            account.role = role.as_str().to_string();
        }
        if let Some(chapter) = &input.chapter {
            account.chapter = Some(chapter.clone());
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, id: &str) -> StoreResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let removed = tables.accounts.remove(id).is_some();
        if removed {
            tables
                .invitations
                .retain(|_, inv| inv.registered_account_id.as_deref() != Some(id));
        }
        Ok(removed)
    }

    async fn insert_invitation(&self, input: &CreateInvitation) -> StoreResult<Invitation> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables
            .invitations
            .values()
            .any(|inv| !inv.used && inv.email == input.email)
        {
            return Err(StoreError::Conflict("uq_invitations_pending_email".into()));
        }

        let invitation = Invitation {
            id: Uuid::now_v7(),
            email: input.email.clone(),
            name: input.name.clone(),
            role: input.role.clone(),
            chapter: input.chapter.clone(),
            code: input.code.clone(),
            created_at: Utc::now(),
            created_by: input.created_by.clone(),
            used: false,
            used_at: None,
            registered_account_id: None,
        };
        tables.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>> {
        self.check_available()?;
        Ok(self.tables.read().await.invitations.get(&id).cloned())
    }

    async fn find_pending_invitation(&self, email: &str) -> StoreResult<Option<Invitation>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .invitations
            .values()
            .find(|inv| !inv.used && inv.email == email)
            .cloned())
    }

    async fn find_pending_invitation_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> StoreResult<Option<Invitation>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .invitations
            .values()
            .find(|inv| !inv.used && inv.email == email && inv.code == code)
            .cloned())
    }

    async fn list_invitations(&self, chapter: Option<&str>) -> StoreResult<Vec<Invitation>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Invitation> = tables
            .invitations
            .values()
            .filter(|inv| chapter_matches(inv.chapter.as_deref(), chapter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete_invitation(&self, id: Uuid) -> StoreResult<bool> {
        self.check_writable()?;
        Ok(self.tables.write().await.invitations.remove(&id).is_some())
    }

    async fn provision_account(
        &self,
        invitation_id: Uuid,
        input: &CreateAccount,
    ) -> StoreResult<Option<Account>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let pending = tables
            .invitations
            .get(&invitation_id)
            .is_some_and(|inv| !inv.used);
        if !pending {
            return Ok(None);
        }
        if tables.accounts.contains_key(&input.id) {
            return Err(StoreError::Conflict("accounts_pkey".into()));
        }
        if tables
            .accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(StoreError::Conflict("uq_accounts_email".into()));
        }

        let now = Utc::now();
        let account = Account {
            id: input.id.clone(),
            email: input.email.clone(),
            name: input.name.clone(),
            role: input.role.as_str().to_string(),
            chapter: input.chapter.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(account.id.clone(), account.clone());

        if let Some(inv) = tables.invitations.get_mut(&invitation_id) {
            inv.used = true;
            inv.used_at = Some(now);
            inv.registered_account_id = Some(account.id.clone());
        }

        Ok(Some(account))
    }

    async fn insert_pitch(&self, input: &CreatePitch) -> StoreResult<Pitch> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables.pitches.contains_key(&input.id) {
            return Err(StoreError::Conflict("pitches_pkey".into()));
        }
        let pitch = Pitch {
            id: input.id.clone(),
            founder_name: input.founder_name.clone(),
            email: input.email.clone(),
            chapter: input.chapter.clone(),
            business_name: input.business_name.clone(),
            summary: input.summary.clone(),
            video_url: input.video_url.clone(),
            is_winner: false,
            created_at: Utc::now(),
        };
        tables.pitches.insert(pitch.id.clone(), pitch.clone());
        Ok(pitch)
    }

    async fn find_pitch(&self, id: &str) -> StoreResult<Option<Pitch>> {
        self.check_available()?;
        Ok(self.tables.read().await.pitches.get(id).cloned())
    }

    async fn list_pitches(&self, chapter: Option<&str>) -> StoreResult<Vec<Pitch>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Pitch> = tables
            .pitches
            .values()
            .filter(|p| chapter_matches(Some(p.chapter.as_str()), chapter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn set_pitch_winner(&self, id: &str, is_winner: bool) -> StoreResult<Option<Pitch>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        Ok(tables.pitches.get_mut(id).map(|p| {
            p.is_winner = is_winner;
            p.clone()
        }))
    }

    async fn upsert_review(&self, input: &UpsertReview) -> StoreResult<Review> {
        self.check_writable()?;
        let review = Review {
            id: input.id.clone(),
            reviewer_id: input.reviewer_id.clone(),
            pitch_id: input.pitch_id.clone(),
            chapter: input.chapter.clone(),
            criterion_scores: Json(input.criterion_scores.clone()),
            overall_rating: input.overall_rating.clone(),
            comments: input.comments.clone(),
            submitted_at: input.submitted_at,
        };
        self.tables
            .write()
            .await
            .reviews
            .insert(review.id.clone(), review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: &str) -> StoreResult<Option<Review>> {
        self.check_available()?;
        Ok(self.tables.read().await.reviews.get(id).cloned())
    }

    async fn list_reviews_for_pitch(&self, pitch_id: &str) -> StoreResult<Vec<Review>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Review> = tables
            .reviews
            .values()
            .filter(|r| r.pitch_id == pitch_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn list_reviews_by_reviewer(&self, reviewer_id: &str) -> StoreResult<Vec<Review>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Review> = tables
            .reviews
            .values()
            .filter(|r| r.reviewer_id == reviewer_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }
}
