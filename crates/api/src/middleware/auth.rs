//! Bearer-token authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chapterhouse_core::error::CoreError;
use chapterhouse_core::identity::Principal;
use chapterhouse_core::scope::Scope;
use chapterhouse_db::models::account::Account;

use crate::auth::jwt::validate_principal_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated principal from the `Authorization: Bearer` header.
///
/// Only the token is checked; the principal may not have an account yet.
/// Used by the session and invitation redemption endpoints.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthenticated(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            )
        })?;

        let claims = validate_principal_token(token, &state.config.principal_token)
            .map_err(|_| AppError::Unauthenticated("Invalid or expired token".into()))?;

        Ok(AuthPrincipal(claims.into()))
    }
}

/// The caller's account and the scope derived from it.
///
/// Never provisions: a principal without an account is rejected with
/// `AccountSetupIncomplete` and must start a session first. An account with a
/// corrupt role is rejected with `AccountRoleInvalid`, which signs it out.
///
/// ```ignore
/// async fn my_handler(caller: CurrentAccount) -> AppResult<Json<()>> {
///     tracing::info!(account_id = %caller.scope.account_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account: Account,
    pub scope: Scope,
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthPrincipal(principal) = AuthPrincipal::from_request_parts(parts, state).await?;

        let account = state
            .store
            .find_account(&principal.subject_id)
            .await?
            .ok_or_else(|| {
                CoreError::AccountSetupIncomplete(
                    "no account for this sign-in; start a session first".into(),
                )
            })?;

        let scope = account.scope()?;
        Ok(CurrentAccount { account, scope })
    }
}
