//! Handlers for session start and the caller's own account.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chapterhouse_db::models::account::Account;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::{AuthPrincipal, CurrentAccount};
use crate::response::DataResponse;
use crate::services::identity::IdentityService;
use crate::state::AppState;

/// Response body for `POST /session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account: Account,
    /// `true` when this sign-in created the account.
    pub provisioned: bool,
}

/// POST /api/v1/session
///
/// Resolve the bearer principal to its account, provisioning it from a
/// pending invitation on first federated sign-in. Returns 201 when an account
/// was created, 200 otherwise.
pub async fn start_session(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> AppResult<(StatusCode, Json<DataResponse<SessionResponse>>)> {
    let resolved = IdentityService::resolve(state.store.as_ref(), &principal).await?;

    let status = if resolved.provisioned {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: SessionResponse {
                account: resolved.account,
                provisioned: resolved.provisioned,
            },
        }),
    ))
}

/// GET /api/v1/me
pub async fn me(caller: CurrentAccount) -> AppResult<Json<DataResponse<Account>>> {
    Ok(Json(DataResponse {
        data: caller.account,
    }))
}
