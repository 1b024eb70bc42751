use axum::http::header::{HeaderValue, RETRY_AFTER};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use chapterhouse_core::error::CoreError;
use chapterhouse_db::store::StoreError;
use serde_json::json;

/// Seconds a client should wait before retrying after a store outage.
const RETRY_AFTER_SECS: &str = "5";

/// Instructs the browser to drop the session on forced sign-out.
const CLEAR_SITE_DATA: HeaderName = HeaderName::from_static("clear-site-data");
const CLEAR_SITE_DATA_VALUE: &str = "\"cookies\", \"storage\"";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// `{ "error", "code", "retryable", "sign_out"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `chapterhouse_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Missing, malformed, or expired principal token.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::AccountRoleInvalid(reason) => {
                    tracing::warn!(%reason, "Forcing sign-out of account with invalid role");
                    (
                        StatusCode::UNAUTHORIZED,
                        core.code(),
                        "Your account is misconfigured. Please sign in again or contact an administrator."
                            .to_string(),
                    )
                }
                CoreError::NotInvited | CoreError::AccountSetupIncomplete(_) => {
                    (StatusCode::FORBIDDEN, core.code(), core.to_string())
                }
                CoreError::PermissionDenied(denial) => {
                    tracing::warn!(%denial, "Permission denied");
                    (StatusCode::FORBIDDEN, core.code(), core.to_string())
                }
                CoreError::InvalidInvite | CoreError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, core.code(), core.to_string())
                }
                CoreError::DuplicateInvite(_) => {
                    (StatusCode::CONFLICT, core.code(), core.to_string())
                }
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    core.code(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::StoreUnavailable(msg) => {
                    tracing::error!(error = %msg, "Store unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        core.code(),
                        "The service is temporarily unavailable. Please retry.".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let (retryable, sign_out) = match &self {
            AppError::Core(core) => (core.is_retryable(), core.forces_sign_out()),
            _ => (false, false),
        };

        let mut body = json!({
            "error": message,
            "code": code,
            "retryable": retryable,
        });
        if sign_out {
            body["sign_out"] = json!(true);
        }

        let mut response = (status, axum::Json(body)).into_response();
        let headers = response.headers_mut();
        if retryable {
            headers.insert(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        if sign_out {
            headers.insert(CLEAR_SITE_DATA, HeaderValue::from_static(CLEAR_SITE_DATA_VALUE));
        }
        response
    }
}
