//! Handlers for the review ledger.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use chapterhouse_db::models::review::Review;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentAccount;
use crate::response::DataResponse;
use crate::services::reviews::{ReviewService, SubmitReview};
use crate::state::AppState;

/// Request body for `PUT /reviews`.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub pitch_id: String,
    /// Defaults to the caller.
    pub reviewer_id: Option<String>,
    #[serde(default)]
    pub criterion_scores: BTreeMap<String, i16>,
    pub overall_rating: Option<String>,
    pub comments: Option<String>,
}

/// PUT /api/v1/reviews
///
/// Create or replace the caller's review of a pitch.
pub async fn submit_review(
    State(state): State<AppState>,
    caller: CurrentAccount,
    Json(input): Json<SubmitReviewRequest>,
) -> AppResult<Json<DataResponse<Review>>> {
    let submit = SubmitReview {
        reviewer_id: input
            .reviewer_id
            .unwrap_or_else(|| caller.scope.account_id.clone()),
        pitch_id: input.pitch_id,
        criterion_scores: input.criterion_scores,
        overall_rating: input.overall_rating,
        comments: input.comments,
    };

    let review = ReviewService::submit(
        state.store.as_ref(),
        &caller.scope,
        submit,
        state.config.store_retry_attempts,
    )
    .await?;
    Ok(Json(DataResponse { data: review }))
}

/// GET /api/v1/reviews/mine
pub async fn list_my_reviews(
    State(state): State<AppState>,
    caller: CurrentAccount,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewService::list_mine(state.store.as_ref(), &caller.scope).await?;
    Ok(Json(DataResponse { data: reviews }))
}
