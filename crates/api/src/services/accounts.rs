//! Account administration: listing, single-field updates, and deletion.

use chapterhouse_core::error::{CoreError, CoreResult};
use chapterhouse_core::invitation::{validate_chapter, validate_name, validate_role};
use chapterhouse_core::roles::Role;
use chapterhouse_core::scope::{AccountChange, Scope};
use chapterhouse_db::models::account::{Account, UpdateAccount};
use chapterhouse_db::store::DirectoryStore;

use super::retry::with_retry;

/// Updatable account fields, as named by API clients.
pub const FIELD_NAME: &str = "name";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_CHAPTER: &str = "chapter";

/// Parse and validate a `(field, value)` pair into an [`AccountChange`].
pub fn parse_change(field: &str, value: &str) -> CoreResult<AccountChange> {
    match field {
        FIELD_NAME => Ok(AccountChange::Name(validate_name(value)?)),
        FIELD_ROLE => Ok(AccountChange::Role(validate_role(value)?)),
        FIELD_CHAPTER => match validate_chapter(Role::SuperAdmin, Some(value))? {
            Some(chapter) => Ok(AccountChange::Chapter(chapter)),
            None => Err(CoreError::Validation("Chapter must not be empty".into())),
        },
        other => Err(CoreError::Validation(format!(
            "Unknown account field '{other}'. Must be one of: {FIELD_NAME}, {FIELD_ROLE}, {FIELD_CHAPTER}"
        ))),
    }
}

pub struct AccountService;

impl AccountService {
    /// Accounts visible to an admin caller.
    pub async fn list(store: &dyn DirectoryStore, caller: &Scope) -> CoreResult<Vec<Account>> {
        caller.require_admin()?;
        Ok(store.list_accounts(caller.chapter_filter()).await?)
    }

    /// Change one field of an account. Store outages are retried up to
    /// `attempts` times in total.
    pub async fn update(
        store: &dyn DirectoryStore,
        caller: &Scope,
        target_id: &str,
        change: AccountChange,
        attempts: u32,
    ) -> CoreResult<Account> {
        let target = store
            .find_account(target_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Account", target_id))?;
        caller.authorize_account_update(&target.as_target(), &change)?;

        if let AccountChange::Role(role) = &change {
            if role.requires_chapter() && target.chapter.is_none() {
                return Err(CoreError::Validation(format!(
                    "Assign a chapter before changing the role to '{role}'"
                )));
            }
        }

        let field = match &change {
            AccountChange::Name(_) => FIELD_NAME,
            AccountChange::Role(_) => FIELD_ROLE,
            AccountChange::Chapter(_) => FIELD_CHAPTER,
        };
        let update = &UpdateAccount::from(change);
        let updated = with_retry(attempts, "account update", move || async move {
            store.update_account(target_id, update).await.map_err(CoreError::from)
        })
        .await?
        .ok_or_else(|| CoreError::not_found("Account", target_id))?;

        tracing::info!(
            account_id = %updated.id,
            field,
            by = %caller.account_id,
            "Account updated",
        );
        Ok(updated)
    }

    /// Delete an account along with the invitation it consumed.
    pub async fn delete(store: &dyn DirectoryStore, caller: &Scope, target_id: &str) -> CoreResult<()> {
        let target = store
            .find_account(target_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Account", target_id))?;
        caller.authorize_account_delete(&target.as_target())?;

        if !store.delete_account(target_id).await? {
            return Err(CoreError::not_found("Account", target_id));
        }

        tracing::info!(
            account_id = %target_id,
            email = %target.email,
            by = %caller.account_id,
            "Account deleted",
        );
        Ok(())
    }
}
