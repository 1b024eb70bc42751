//! Credential lookups against the authentication provider.
//!
//! Before an invitation is issued the provider is asked whether the email can
//! already sign in; an existing credential blocks issuance.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chapterhouse_core::error::{CoreError, CoreResult};
use chapterhouse_core::invitation::normalize_email;
use serde::Deserialize;

/// HTTP request timeout for a single lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait CredentialRegistry: Send + Sync + 'static {
    /// Whether the provider already holds a sign-in credential for `email`.
    async fn has_credential(&self, email: &str) -> CoreResult<bool>;
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LookupResponse {
    exists: bool,
}

/// Asks the provider's lookup endpoint: `GET {url}?email=...` answering
/// `{ "exists": bool }`.
pub struct HttpCredentialRegistry {
    client: reqwest::Client,
    url: String,
}

impl HttpCredentialRegistry {
    pub fn new(url: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, url })
    }

    async fn lookup(&self, email: &str) -> Result<bool, reqwest::Error> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("email", email)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<LookupResponse>().await?.exists)
    }
}

#[async_trait]
impl CredentialRegistry for HttpCredentialRegistry {
    async fn has_credential(&self, email: &str) -> CoreResult<bool> {
        self.lookup(email).await.map_err(|e| {
            tracing::error!(error = %e, url = %self.url, "Credential lookup failed");
            CoreError::StoreUnavailable(format!("credential lookup failed: {e}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Static
// ---------------------------------------------------------------------------

/// Fixed set of emails with credentials. Empty when no lookup endpoint is
/// configured, which disables the check.
#[derive(Debug, Default)]
pub struct StaticCredentialRegistry {
    emails: HashSet<String>,
}

impl StaticCredentialRegistry {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails.into_iter().map(|e| normalize_email(e.as_ref())).collect(),
        }
    }
}

#[async_trait]
impl CredentialRegistry for StaticCredentialRegistry {
    async fn has_credential(&self, email: &str) -> CoreResult<bool> {
        Ok(self.emails.contains(&normalize_email(email)))
    }
}
