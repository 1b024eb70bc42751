//! Handlers for invitation management and redemption.
//!
//! Management endpoints require an admin via [`RequireAdmin`]; redemption only
//! needs a valid principal token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chapterhouse_db::models::account::Account;
use chapterhouse_db::models::invitation::Invitation;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthPrincipal;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::invitations::{InvitationService, IssueInvitation};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/invitations`.
#[derive(Debug, Deserialize)]
pub struct IssueInvitationRequest {
    pub email: String,
    pub name: String,
    pub role: String,
    pub chapter: Option<String>,
}

/// Request body for `POST /invitations/redeem`.
#[derive(Debug, Deserialize)]
pub struct RedeemInvitationRequest {
    pub code: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/invitations
///
/// Issue an invitation. The response carries the redemption code.
pub async fn issue_invitation(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Json(input): Json<IssueInvitationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Invitation>>)> {
    let invitation = InvitationService::issue(
        state.store.as_ref(),
        state.credentials.as_ref(),
        &caller.scope,
        IssueInvitation {
            email: input.email,
            name: input.name,
            role: input.role,
            chapter: input.chapter,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// GET /api/v1/admin/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Invitation>>>> {
    let invitations = InvitationService::list(state.store.as_ref(), &caller.scope).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// DELETE /api/v1/admin/invitations/{id}
pub async fn revoke_invitation(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    InvitationService::revoke(state.store.as_ref(), &caller.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/invitations/redeem
///
/// Redeem a code for the signed-in principal and create its account.
pub async fn redeem_invitation(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(input): Json<RedeemInvitationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Account>>)> {
    let account = InvitationService::consume_by_code(
        state.store.as_ref(),
        &principal,
        &input.code,
        &input.name,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
}
