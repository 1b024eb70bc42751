//! First-run setup.
//!
//! Invitations can only be issued by admins, so a fresh deployment seeds one
//! super admin invitation for a configured email.

use chapterhouse_core::error::CoreResult;
use chapterhouse_core::invitation::{generate_invite_code, validate_email};
use chapterhouse_core::roles::Role;
use chapterhouse_db::models::invitation::{CreateInvitation, Invitation};
use chapterhouse_db::store::{DirectoryStore, StoreError};

/// `created_by` recorded on invitations issued at startup.
pub const SYSTEM_ISSUER: &str = "system";

/// Ensure `email` can become a super admin.
///
/// Issues a super admin invitation unless the email already has an account or
/// a pending invitation. Returns the new invitation, if any.
pub async fn ensure_super_admin_invitation(
    store: &dyn DirectoryStore,
    email: &str,
) -> CoreResult<Option<Invitation>> {
    let email = validate_email(email)?;

    if store.find_account_by_email(&email).await?.is_some() {
        tracing::debug!(%email, "Bootstrap account already exists");
        return Ok(None);
    }
    if store.find_pending_invitation(&email).await?.is_some() {
        tracing::debug!(%email, "Bootstrap invitation already pending");
        return Ok(None);
    }

    let create = CreateInvitation {
        email,
        name: "Administrator".to_string(),
        role: Role::SuperAdmin.as_str().to_string(),
        chapter: None,
        code: generate_invite_code(),
        created_by: SYSTEM_ISSUER.to_string(),
    };

    match store.insert_invitation(&create).await {
        Ok(invitation) => {
            tracing::info!(
                invitation_id = %invitation.id,
                email = %invitation.email,
                "Bootstrap super admin invitation issued",
            );
            Ok(Some(invitation))
        }
        // Another instance got there first.
        Err(StoreError::Conflict(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
