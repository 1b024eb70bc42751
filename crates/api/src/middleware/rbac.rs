//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`CurrentAccount`] and rejects callers whose role is
//! too low. Chapter checks still happen in the services.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::CurrentAccount;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `admin` or `superAdmin`. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(caller): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub CurrentAccount);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = CurrentAccount::from_request_parts(parts, state).await?;
        caller.scope.require_admin()?;
        Ok(RequireAdmin(caller))
    }
}
