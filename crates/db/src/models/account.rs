//! Account entity model and DTOs.

use chapterhouse_core::error::CoreResult;
use chapterhouse_core::roles::Role;
use chapterhouse_core::scope::{AccountChange, AccountTarget, Scope};
use chapterhouse_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `accounts` table.
///
/// `id` is the identity provider's subject id. `role` is kept as raw text;
/// use [`Account::scope`] to validate it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub chapter: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    /// Derive the caller scope for this account. Fails with
    /// `AccountRoleInvalid` for a corrupt role or missing chapter.
    pub fn scope(&self) -> CoreResult<Scope> {
        Scope::for_account(&self.id, &self.role, self.chapter.as_deref())
    }

    /// View of this account as the target of a write.
    pub fn as_target(&self) -> AccountTarget<'_> {
        AccountTarget {
            id: &self.id,
            role: Role::parse(&self.role),
            chapter: self.chapter.as_deref(),
        }
    }
}

/// DTO for provisioning a new account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub chapter: Option<String>,
}

/// DTO for updating an account. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub chapter: Option<String>,
}

impl From<AccountChange> for UpdateAccount {
    fn from(change: AccountChange) -> Self {
        match change {
            AccountChange::Name(name) => UpdateAccount {
                name: Some(name),
                ..Default::default()
            },
            AccountChange::Role(role) => UpdateAccount {
                role: Some(role),
                ..Default::default()
            },
            AccountChange::Chapter(chapter) => UpdateAccount {
                chapter: Some(chapter),
                ..Default::default()
            },
        }
    }
}
