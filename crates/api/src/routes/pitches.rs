use axum::routing::{get, put};
use axum::Router;

use crate::handlers::pitches;
use crate::state::AppState;

/// Routes mounted at `/pitches`.
///
/// ```text
/// GET /                      -> list_pitches
/// PUT /{id}/winner           -> set_winner
/// GET /{id}/reviews/summary  -> review_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pitches::list_pitches))
        .route("/{id}/winner", put(pitches::set_winner))
        .route("/{id}/reviews/summary", get(pitches::review_summary))
}
