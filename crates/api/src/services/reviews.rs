//! Review ledger and review summaries.

use std::collections::{BTreeMap, BTreeSet};

use chapterhouse_core::aggregation::{
    aggregate_reviews, GroupedSummary, ReviewerDirectory, ReviewerProfile,
};
use chapterhouse_core::error::{CoreError, CoreResult};
use chapterhouse_core::review::{
    review_chapter, review_key, validate_comments, validate_criterion_scores,
    validate_overall_rating,
};
use chapterhouse_core::scope::Scope;
use chapterhouse_db::models::account::Account;
use chapterhouse_db::models::pitch::Pitch;
use chapterhouse_db::models::review::{Review, UpsertReview};
use chapterhouse_db::store::DirectoryStore;

use super::retry::with_retry;

/// A reviewer's rating of one pitch.
#[derive(Debug, Clone)]
pub struct SubmitReview {
    pub reviewer_id: String,
    pub pitch_id: String,
    pub criterion_scores: BTreeMap<String, i16>,
    pub overall_rating: Option<String>,
    pub comments: Option<String>,
}

pub struct ReviewService;

impl ReviewService {
    /// Create or overwrite the caller's review of a pitch.
    ///
    /// The review lives at `reviewer_id:pitch_id`; resubmitting replaces it
    /// and concurrent submissions resolve last-write-wins. Store outages are
    /// retried up to `attempts` times in total.
    pub async fn submit(
        store: &dyn DirectoryStore,
        caller: &Scope,
        input: SubmitReview,
        attempts: u32,
    ) -> CoreResult<Review> {
        caller.authorize_review_write(&input.reviewer_id)?;
        validate_criterion_scores(&input.criterion_scores)?;
        let overall_rating = validate_overall_rating(input.overall_rating.as_deref())?;
        let comments = validate_comments(input.comments.as_deref())?;

        let pitch = find_readable_pitch(store, caller, &input.pitch_id).await?;

        let upsert = UpsertReview {
            id: review_key(&input.reviewer_id, &pitch.id),
            chapter: review_chapter(&pitch.chapter, caller.chapter.as_deref()).to_string(),
            reviewer_id: input.reviewer_id,
            pitch_id: pitch.id,
            criterion_scores: input.criterion_scores,
            overall_rating,
            comments,
            submitted_at: chrono::Utc::now(),
        };

        let upsert = &upsert;
        let review = with_retry(attempts, "review upsert", move || async move {
            store.upsert_review(upsert).await.map_err(CoreError::from)
        })
        .await?;

        tracing::info!(
            review_id = %review.id,
            chapter = %review.chapter,
            rating = ?review.overall_rating,
            "Review submitted",
        );
        Ok(review)
    }

    /// The caller's own reviews, most recent first.
    pub async fn list_mine(store: &dyn DirectoryStore, caller: &Scope) -> CoreResult<Vec<Review>> {
        Ok(store.list_reviews_by_reviewer(&caller.account_id).await?)
    }

    /// Grouped summary of every review of a pitch. Admins only, and only
    /// inside their chapter unless super admin.
    pub async fn summary(
        store: &dyn DirectoryStore,
        caller: &Scope,
        pitch_id: &str,
    ) -> CoreResult<GroupedSummary> {
        caller.require_admin()?;
        let pitch = store
            .find_pitch(pitch_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Pitch", pitch_id))?;
        caller.authorize_review_summary(&pitch.chapter)?;

        let reviews = store.list_reviews_for_pitch(&pitch.id).await?;
        let reviewer_ids: Vec<String> = reviews
            .iter()
            .map(|r| r.reviewer_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let accounts = store.find_accounts(&reviewer_ids).await?;

        Ok(aggregate_reviews(&pitch.id, &reviews, &reviewer_directory(accounts)))
    }
}

/// Load a pitch the caller may read. Pitches outside the caller's chapter
/// are reported as missing.
pub(crate) async fn find_readable_pitch(
    store: &dyn DirectoryStore,
    caller: &Scope,
    pitch_id: &str,
) -> CoreResult<Pitch> {
    store
        .find_pitch(pitch_id)
        .await?
        .filter(|p| caller.can_read_chapter(Some(&p.chapter)))
        .ok_or_else(|| CoreError::not_found("Pitch", pitch_id))
}

fn reviewer_directory(accounts: Vec<Account>) -> ReviewerDirectory {
    accounts
        .into_iter()
        .map(|a| {
            let profile = ReviewerProfile {
                name: Some(a.name).filter(|n| !n.trim().is_empty()),
                email: Some(a.email).filter(|e| !e.trim().is_empty()),
            };
            (a.id, profile)
        })
        .collect()
}
