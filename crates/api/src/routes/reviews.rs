use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// PUT /      -> submit_review
/// GET /mine  -> list_my_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", put(reviews::submit_review))
        .route("/mine", get(reviews::list_my_reviews))
}
