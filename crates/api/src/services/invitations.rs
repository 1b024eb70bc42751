//! Invitation issuance, redemption, and revocation.
//!
//! Accounts only come into existence by consuming an invitation, either here
//! (direct sign-up with a code) or through [`IdentityService`] (federated
//! sign-in matched by email).
//!
//! [`IdentityService`]: super::identity::IdentityService

use chapterhouse_core::error::{CoreError, CoreResult, DuplicateReason};
use chapterhouse_core::identity::Principal;
use chapterhouse_core::invitation::{
    generate_invite_code, normalize_code, validate_invitation, validate_name,
};
use chapterhouse_core::roles::Role;
use chapterhouse_core::scope::Scope;
use chapterhouse_db::models::account::{Account, CreateAccount};
use chapterhouse_db::models::invitation::{CreateInvitation, Invitation};
use chapterhouse_db::store::{DirectoryStore, StoreError};
use uuid::Uuid;

use super::credentials::CredentialRegistry;

/// Fields an admin supplies when inviting someone.
#[derive(Debug, Clone)]
pub struct IssueInvitation {
    pub email: String,
    pub name: String,
    pub role: String,
    pub chapter: Option<String>,
}

pub struct InvitationService;

impl InvitationService {
    /// Issue an invitation and return it, code included.
    ///
    /// Fails with `DuplicateInvite` if the email already has a credential at
    /// the auth provider, an account, or a pending invitation. Never retried.
    pub async fn issue(
        store: &dyn DirectoryStore,
        credentials: &dyn CredentialRegistry,
        issuer: &Scope,
        input: IssueInvitation,
    ) -> CoreResult<Invitation> {
        issuer.require_admin()?;
        let valid = validate_invitation(
            &input.email,
            &input.name,
            &input.role,
            input.chapter.as_deref(),
        )?;
        issuer.authorize_invitation(valid.role, valid.chapter.as_deref())?;

        if credentials.has_credential(&valid.email).await? {
            return Err(CoreError::DuplicateInvite(DuplicateReason::CredentialExists));
        }
        if store.find_account_by_email(&valid.email).await?.is_some() {
            return Err(CoreError::DuplicateInvite(DuplicateReason::AccountExists));
        }
        if store.find_pending_invitation(&valid.email).await?.is_some() {
            return Err(CoreError::DuplicateInvite(DuplicateReason::PendingInvitation));
        }

        let create = CreateInvitation {
            email: valid.email,
            name: valid.name,
            role: valid.role.as_str().to_string(),
            chapter: valid.chapter,
            code: generate_invite_code(),
            created_by: issuer.account_id.clone(),
        };

        // A concurrent issuance for the same email loses on the pending index.
        let invitation = store.insert_invitation(&create).await.map_err(|e| match e {
            StoreError::Conflict(_) => {
                CoreError::DuplicateInvite(DuplicateReason::PendingInvitation)
            }
            other => other.into(),
        })?;

        tracing::info!(
            invitation_id = %invitation.id,
            email = %invitation.email,
            role = %invitation.role,
            chapter = ?invitation.chapter,
            issued_by = %issuer.account_id,
            "Invitation issued",
        );
        Ok(invitation)
    }

    /// Redeem an invitation code for a freshly registered direct-credential
    /// principal, creating its account.
    ///
    /// The invitation must match both the code and the principal's email and
    /// still be pending; anything else is `InvalidInvite`. A principal that
    /// already owns an account hits `DuplicateInvite(AccountExists)` when
    /// provisioning.
    pub async fn consume_by_code(
        store: &dyn DirectoryStore,
        principal: &Principal,
        code: &str,
        name: &str,
    ) -> CoreResult<Account> {
        let email = principal.normalized_email().ok_or_else(|| {
            CoreError::Validation("The signed-in principal has no email address".into())
        })?;
        let name = validate_name(name)?;

        let invitation = store
            .find_pending_invitation_by_code(&email, &normalize_code(code))
            .await?
            .ok_or(CoreError::InvalidInvite)?;

        let account = provision(store, &invitation, &principal.subject_id, name)
            .await?
            .ok_or(CoreError::InvalidInvite)?;

        tracing::info!(
            account_id = %account.id,
            invitation_id = %invitation.id,
            role = %account.role,
            "Invitation redeemed by code",
        );
        Ok(account)
    }

    /// Delete an invitation, used or not. A provisioned account stays.
    pub async fn revoke(store: &dyn DirectoryStore, caller: &Scope, id: Uuid) -> CoreResult<()> {
        caller.require_admin()?;

        let invitation = store
            .find_invitation(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Invitation", id.to_string()))?;
        caller.authorize_revoke(invitation.chapter.as_deref())?;

        if !store.delete_invitation(id).await? {
            return Err(CoreError::not_found("Invitation", id.to_string()));
        }

        tracing::info!(
            invitation_id = %id,
            email = %invitation.email,
            was_used = invitation.used,
            revoked_by = %caller.account_id,
            "Invitation revoked",
        );
        Ok(())
    }

    /// Invitations visible to the caller, newest first.
    pub async fn list(store: &dyn DirectoryStore, caller: &Scope) -> CoreResult<Vec<Invitation>> {
        caller.require_admin()?;
        Ok(store.list_invitations(caller.chapter_filter()).await?)
    }
}

/// Create the account for `subject_id` from `invitation` and mark the
/// invitation used, in one store transaction.
///
/// Returns `None` if the invitation was consumed in the meantime. An account
/// id or email collision surfaces as `DuplicateInvite(AccountExists)`.
pub(crate) async fn provision(
    store: &dyn DirectoryStore,
    invitation: &Invitation,
    subject_id: &str,
    name: String,
) -> CoreResult<Option<Account>> {
    let role = Role::parse(&invitation.role).ok_or_else(|| {
        CoreError::AccountRoleInvalid(format!(
            "invitation {} carries unknown role '{}'",
            invitation.id, invitation.role
        ))
    })?;

    let create = CreateAccount {
        id: subject_id.to_string(),
        email: invitation.email.clone(),
        name,
        role,
        chapter: invitation.chapter.clone(),
    };

    store
        .provision_account(invitation.id, &create)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => CoreError::DuplicateInvite(DuplicateReason::AccountExists),
            other => other.into(),
        })
}
