pub mod accounts;
pub mod admin;
pub mod health;
pub mod invitations;
pub mod pitches;
pub mod reviews;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session                                 start session (principal token)
/// /me                                      current account
///
/// /invitations/redeem                      redeem code (principal token)
///
/// /admin/invitations                       list, issue (admin only)
/// /admin/invitations/{id}                  revoke (admin only)
/// /admin/accounts                          list (admin only)
///
/// /accounts/{id}                           update one field, delete
///
/// /pitches                                 list (chapter scoped)
/// /pitches/{id}/winner                     set winner flag (admin only)
/// /pitches/{id}/reviews/summary            grouped review summary (admin only)
///
/// /reviews                                 submit (upsert)
/// /reviews/mine                            caller's reviews
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(handlers::session::start_session))
        .route("/me", get(handlers::session::me))
        .nest("/invitations", invitations::router())
        .nest("/admin", admin::router())
        .nest("/accounts", accounts::router())
        .nest("/pitches", pitches::router())
        .nest("/reviews", reviews::router())
}
