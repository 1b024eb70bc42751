//! Authorization guard.
//!
//! A [`Scope`] is derived once per request from the caller's account and is
//! then consulted for every read filter and write check. Each failed write
//! rule maps to its own [`Denial`].

use crate::error::{CoreError, CoreResult, Denial};
use crate::roles::Role;

/// Effective permissions of the calling account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub account_id: String,
    pub role: Role,
    /// Always `Some` for lp and admin.
    pub chapter: Option<String>,
}

/// The account a write is aimed at.
#[derive(Debug, Clone, Copy)]
pub struct AccountTarget<'a> {
    pub id: &'a str,
    /// `None` when the stored role is not a valid role name.
    pub role: Option<Role>,
    pub chapter: Option<&'a str>,
}

/// A single-field account change, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountChange {
    Name(String),
    Role(Role),
    Chapter(String),
}

impl Scope {
    /// Derive a scope from stored account fields.
    ///
    /// Fails with `AccountRoleInvalid` when the role is unknown or a
    /// chapter-bound role has no chapter; such accounts get no access at all.
    pub fn for_account(account_id: &str, role: &str, chapter: Option<&str>) -> CoreResult<Self> {
        let role = Role::parse(role)
            .ok_or_else(|| CoreError::AccountRoleInvalid(format!("unknown role '{role}'")))?;

        let chapter = chapter
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        if role.requires_chapter() && chapter.is_none() {
            return Err(CoreError::AccountRoleInvalid(format!(
                "role '{role}' requires a chapter"
            )));
        }

        Ok(Self {
            account_id: account_id.to_string(),
            role,
            chapter,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /* ----------------------------------------------------------------------
    Reads
    ---------------------------------------------------------------------- */

    /// Chapter that chapter-scoped reads must be filtered to; `None` means
    /// unfiltered.
    pub fn chapter_filter(&self) -> Option<&str> {
        if self.is_super_admin() {
            None
        } else {
            self.chapter.as_deref()
        }
    }

    pub fn can_read_chapter(&self, chapter: Option<&str>) -> bool {
        match self.chapter_filter() {
            None => true,
            Some(own) => chapter == Some(own),
        }
    }

    /* ----------------------------------------------------------------------
    Writes
    ---------------------------------------------------------------------- */

    pub fn require_admin(&self) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(Denial::AdminRequired))
        }
    }

    pub fn require_super_admin(&self) -> CoreResult<()> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(Denial::SuperAdminRequired))
        }
    }

    /// Chapter-scoped admins may only act inside their own chapter.
    fn require_chapter(&self, chapter: Option<&str>) -> CoreResult<()> {
        if self.can_read_chapter(chapter) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(Denial::OutsideChapter))
        }
    }

    /// Check that the caller may issue an invitation for `role` in `chapter`.
    pub fn authorize_invitation(&self, role: Role, chapter: Option<&str>) -> CoreResult<()> {
        self.require_admin()?;
        if role.is_super_admin() {
            self.require_super_admin()?;
        }
        self.require_chapter(chapter)
    }

    /// Check that the caller may revoke an invitation filed under `chapter`.
    pub fn authorize_revoke(&self, chapter: Option<&str>) -> CoreResult<()> {
        self.require_admin()?;
        self.require_chapter(chapter)
    }

    /// Check that the caller may flip the winner flag of a pitch.
    pub fn authorize_winner(&self, pitch_chapter: &str) -> CoreResult<()> {
        self.require_admin()?;
        self.require_chapter(Some(pitch_chapter))
    }

    /// Check that the caller may see the review summary of a pitch.
    pub fn authorize_review_summary(&self, pitch_chapter: &str) -> CoreResult<()> {
        self.require_admin()?;
        self.require_chapter(Some(pitch_chapter))
    }

    /// A review may only be written by its own reviewer.
    pub fn authorize_review_write(&self, reviewer_id: &str) -> CoreResult<()> {
        if reviewer_id == self.account_id {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(Denial::ReviewerMismatch))
        }
    }

    /// Check a single-field update of `target`.
    pub fn authorize_account_update(
        &self,
        target: &AccountTarget<'_>,
        change: &AccountChange,
    ) -> CoreResult<()> {
        if target.id == self.account_id {
            return match change {
                AccountChange::Name(_) => Ok(()),
                AccountChange::Role(_) | AccountChange::Chapter(_) if self.is_super_admin() => {
                    Ok(())
                }
                AccountChange::Role(_) | AccountChange::Chapter(_) => Err(
                    CoreError::PermissionDenied(Denial::SelfRoleOrChapterChange),
                ),
            };
        }

        self.require_admin()?;
        if target.role.is_some_and(Role::is_super_admin) {
            self.require_super_admin()?;
        }
        self.require_chapter(target.chapter)?;

        match change {
            AccountChange::Name(_) => Ok(()),
            AccountChange::Role(role) if role.is_super_admin() => self.require_super_admin(),
            AccountChange::Role(_) => Ok(()),
            AccountChange::Chapter(_) => self.require_super_admin(),
        }
    }

    /// Check deletion of `target`. Nobody may delete their own account.
    pub fn authorize_account_delete(&self, target: &AccountTarget<'_>) -> CoreResult<()> {
        if target.id == self.account_id {
            return Err(CoreError::PermissionDenied(Denial::SelfDeletion));
        }
        self.require_admin()?;
        if target.role.is_some_and(Role::is_super_admin) {
            self.require_super_admin()?;
        }
        self.require_chapter(target.chapter)
    }
}
