use axum::routing::patch;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// PATCH  /{id} -> update_account
/// DELETE /{id} -> delete_account
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        patch(accounts::update_account).delete(accounts::delete_account),
    )
}
