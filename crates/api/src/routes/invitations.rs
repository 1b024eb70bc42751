use axum::routing::post;
use axum::Router;

use crate::handlers::invitations;
use crate::state::AppState;

/// Routes mounted at `/invitations`.
///
/// ```text
/// POST /redeem -> redeem_invitation
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/redeem", post(invitations::redeem_invitation))
}
