use axum::extract::{Path, State};
use axum::Json;
use chapterhouse_core::aggregation::GroupedSummary;
use chapterhouse_db::models::pitch::Pitch;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentAccount;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::pitches::PitchService;
use crate::services::reviews::ReviewService;
use crate::state::AppState;

/// Request body for `PUT /pitches/{id}/winner`.
#[derive(Debug, Deserialize)]
pub struct SetWinnerRequest {
    pub is_winner: bool,
}

/// GET /api/v1/pitches
pub async fn list_pitches(
    State(state): State<AppState>,
    caller: CurrentAccount,
) -> AppResult<Json<DataResponse<Vec<Pitch>>>> {
    let pitches = PitchService::list(state.store.as_ref(), &caller.scope).await?;
    Ok(Json(DataResponse { data: pitches }))
}

/// PUT /api/v1/pitches/{id}/winner
pub async fn set_winner(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<SetWinnerRequest>,
) -> AppResult<Json<DataResponse<Pitch>>> {
    let pitch =
        PitchService::assign_winner(state.store.as_ref(), &caller.scope, &id, input.is_winner)
            .await?;
    Ok(Json(DataResponse { data: pitch }))
}

/// GET /api/v1/pitches/{id}/reviews/summary
pub async fn review_summary(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<GroupedSummary>>> {
    let summary = ReviewService::summary(state.store.as_ref(), &caller.scope, &id).await?;
    Ok(Json(DataResponse { data: summary }))
}
