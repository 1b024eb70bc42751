//! Handlers for account administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chapterhouse_db::models::account::Account;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentAccount;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::accounts::{parse_change, AccountService};
use crate::state::AppState;

/// Request body for `PATCH /accounts/{id}`: one field at a time.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// `name`, `role`, or `chapter`.
    pub field: String,
    pub value: String,
}

/// GET /api/v1/admin/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Account>>>> {
    let accounts = AccountService::list(state.store.as_ref(), &caller.scope).await?;
    Ok(Json(DataResponse { data: accounts }))
}

/// PATCH /api/v1/accounts/{id}
///
/// Open to every account: anyone may rename themselves; everything else is
/// checked against the caller's role and chapter.
pub async fn update_account(
    State(state): State<AppState>,
    caller: CurrentAccount,
    Path(id): Path<String>,
    Json(input): Json<UpdateAccountRequest>,
) -> AppResult<Json<DataResponse<Account>>> {
    let change = parse_change(&input.field, &input.value)?;
    let account = AccountService::update(
        state.store.as_ref(),
        &caller.scope,
        &id,
        change,
        state.config.store_retry_attempts,
    )
    .await?;
    Ok(Json(DataResponse { data: account }))
}

/// DELETE /api/v1/accounts/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    caller: CurrentAccount,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    AccountService::delete(state.store.as_ref(), &caller.scope, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
