//! Identity resolution: principal in, account (or a precise refusal) out.

use chapterhouse_core::error::{CoreError, CoreResult, DuplicateReason};
use chapterhouse_core::identity::Principal;
use chapterhouse_core::scope::Scope;
use chapterhouse_db::models::account::Account;
use chapterhouse_db::store::DirectoryStore;

use super::invitations::provision;

/// An account resolved for a principal.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub account: Account,
    pub scope: Scope,
    /// Whether the account was created by this resolution.
    pub provisioned: bool,
}

pub struct IdentityService;

impl IdentityService {
    /// Map `principal` to its account, provisioning one from a pending
    /// invitation for federated sign-ins.
    ///
    /// - Existing account with a valid role: returned as-is.
    /// - Existing account with an invalid role: `AccountRoleInvalid`.
    /// - No account, federated provider: provisioned from the pending
    ///   invitation for the principal's email, else `NotInvited`.
    /// - No account, direct credential: `AccountSetupIncomplete`.
    pub async fn resolve(
        store: &dyn DirectoryStore,
        principal: &Principal,
    ) -> CoreResult<ResolvedIdentity> {
        if let Some(account) = store.find_account(&principal.subject_id).await? {
            let scope = account.scope()?;
            return Ok(ResolvedIdentity {
                account,
                scope,
                provisioned: false,
            });
        }

        if !principal.is_federated() {
            return Err(CoreError::AccountSetupIncomplete(
                "password sign-ups must redeem an invitation code".into(),
            ));
        }

        let email = principal.normalized_email().ok_or(CoreError::NotInvited)?;
        let invitation = store
            .find_pending_invitation(&email)
            .await?
            .ok_or(CoreError::NotInvited)?;

        let name = invitation.name.clone();
        let provisioned = match provision(store, &invitation, &principal.subject_id, name).await {
            Ok(Some(account)) => Some(account),
            // A concurrent session start for the same subject may have won.
            Ok(None) | Err(CoreError::DuplicateInvite(DuplicateReason::AccountExists)) => None,
            Err(e) => return Err(e),
        };

        let (account, provisioned) = match provisioned {
            Some(account) => {
                tracing::info!(
                    account_id = %account.id,
                    invitation_id = %invitation.id,
                    provider = %principal.provider,
                    role = %account.role,
                    "Account provisioned from invitation",
                );
                (account, true)
            }
            None => {
                let account = store
                    .find_account(&principal.subject_id)
                    .await?
                    .ok_or(CoreError::NotInvited)?;
                (account, false)
            }
        };

        let scope = account.scope()?;
        Ok(ResolvedIdentity {
            account,
            scope,
            provisioned,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chapterhouse_core::roles::Role;
    use chapterhouse_db::models::invitation::CreateInvitation;
    use chapterhouse_db::store::MemoryDirectoryStore;

    use super::*;
    use crate::services::test_support::{direct_principal, federated_principal, seed};

    async fn invite(store: &MemoryDirectoryStore, email: &str, role: &str, chapter: Option<&str>) {
        store
            .insert_invitation(&CreateInvitation {
                email: email.to_string(),
                name: "Invited Person".to_string(),
                role: role.to_string(),
                chapter: chapter.map(String::from),
                code: "ABC123".to_string(),
                created_by: "admin-1".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_existing_account_is_returned() {
        let store = MemoryDirectoryStore::new();
        seed(&store, "sub-1", "a@x.org", Role::Admin, Some("Denver")).await;

        let resolved = IdentityService::resolve(&store, &federated_principal("sub-1", "a@x.org"))
            .await
            .unwrap();
        assert!(!resolved.provisioned);
        assert_eq!(resolved.scope.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_invalid_role_is_rejected() {
        let store = MemoryDirectoryStore::new();
        seed(&store, "sub-1", "a@x.org", Role::Lp, Some("Denver")).await;
        let mut account = store.find_account("sub-1").await.unwrap().unwrap();
        account.role = "owner".to_string();
        store.seed_account(account).await;

        let err = IdentityService::resolve(&store, &federated_principal("sub-1", "a@x.org")).await;
        assert_matches!(err, Err(CoreError::AccountRoleInvalid(_)));
    }

    #[tokio::test]
    async fn test_federated_sign_in_provisions_from_invitation() {
        let store = MemoryDirectoryStore::new();
        invite(&store, "alice@x.org", "lp", Some("Denver")).await;

        let principal = federated_principal("google|alice", "Alice@X.org");
        let resolved = IdentityService::resolve(&store, &principal).await.unwrap();
        assert!(resolved.provisioned);
        assert_eq!(resolved.account.id, "google|alice");
        assert_eq!(resolved.account.name, "Invited Person");
        assert_eq!(resolved.scope.chapter.as_deref(), Some("Denver"));
        assert!(store.find_pending_invitation("alice@x.org").await.unwrap().is_none());

        // The next session start finds the account.
        let again = IdentityService::resolve(&store, &principal).await.unwrap();
        assert!(!again.provisioned);
        assert_eq!(again.account, resolved.account);
    }

    #[tokio::test]
    async fn test_federated_sign_in_without_invitation() {
        let store = MemoryDirectoryStore::new();
        let err = IdentityService::resolve(&store, &federated_principal("google|x", "x@x.org")).await;
        assert_matches!(err, Err(CoreError::NotInvited));

        let no_email = Principal {
            subject_id: "google|y".to_string(),
            email: None,
            provider: "google.com".to_string(),
        };
        let err = IdentityService::resolve(&store, &no_email).await;
        assert_matches!(err, Err(CoreError::NotInvited));
    }

    #[tokio::test]
    async fn test_direct_credential_is_not_provisioned() {
        let store = MemoryDirectoryStore::new();
        invite(&store, "alice@x.org", "lp", Some("Denver")).await;

        let err = IdentityService::resolve(&store, &direct_principal("uid-alice", "alice@x.org")).await;
        assert_matches!(err, Err(CoreError::AccountSetupIncomplete(_)));
        assert!(store.find_pending_invitation("alice@x.org").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_outage_leaves_principal_unresolved() {
        let store = MemoryDirectoryStore::new();
        invite(&store, "alice@x.org", "lp", Some("Denver")).await;
        store.set_offline(true);

        let err = IdentityService::resolve(&store, &federated_principal("google|alice", "alice@x.org")).await;
        assert_matches!(err, Err(CoreError::StoreUnavailable(_)));

        store.set_offline(false);
        assert!(store.find_account("google|alice").await.unwrap().is_none());
    }
}
