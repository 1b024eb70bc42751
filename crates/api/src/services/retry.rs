//! Bounded retry for idempotent store writes.
//!
//! Only [`CoreError::StoreUnavailable`] is retried. Callers must only wrap
//! writes that are safe to repeat (review upsert, single-field account
//! update); invitation issuance is never retried.

use std::future::Future;
use std::time::Duration;

use chapterhouse_core::error::CoreResult;

/// Delay before the first retry; doubles on each further attempt.
const BASE_DELAY: Duration = Duration::from_millis(100);

/// Run `op` up to `attempts` times (at least once), backing off
/// exponentially between retryable failures.
pub async fn with_retry<T, F, Fut>(attempts: u32, what: &str, mut op: F) -> CoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CoreResult<T>>,
{
    let attempts = attempts.max(1);
    let mut delay = BASE_DELAY;

    for attempt in 1..attempts {
        match op().await {
            Err(e) if e.is_retryable() => {
                tracing::warn!(attempt, what, error = %e, "Store write failed, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            other => return other,
        }
    }

    op().await
}
