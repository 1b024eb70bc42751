//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{accounts, invitations};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require an admin (enforced by handler extractors).
///
/// ```text
/// GET    /invitations        -> list_invitations
/// POST   /invitations        -> issue_invitation
/// DELETE /invitations/{id}   -> revoke_invitation
/// GET    /accounts           -> list_accounts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/invitations",
            get(invitations::list_invitations).post(invitations::issue_invitation),
        )
        .route("/invitations/{id}", delete(invitations::revoke_invitation))
        .route("/accounts", get(accounts::list_accounts))
}
