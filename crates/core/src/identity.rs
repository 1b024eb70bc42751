//! Principals asserted by the external authentication provider.

use serde::{Deserialize, Serialize};

use crate::invitation::normalize_email;

/// Provider name used for email + password sign-up.
///
/// Principals from this provider are never auto-provisioned; they must redeem
/// an invitation code explicitly.
pub const DIRECT_CREDENTIAL_PROVIDER: &str = "password";

/// Identity supplied by the auth provider after login, before it is resolved
/// to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable subject id; becomes the account id.
    pub subject_id: String,
    pub email: Option<String>,
    pub provider: String,
}

impl Principal {
    /// Federated providers (Google, Microsoft, ...) may provision an account
    /// straight from a pending invitation.
    pub fn is_federated(&self) -> bool {
        self.provider != DIRECT_CREDENTIAL_PROVIDER
    }

    /// Lowercased, trimmed email, or `None` when absent or blank.
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
    }
}
