use std::fmt;

/// Which issuance precondition an invitation request violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReason {
    /// The auth provider already holds a credential for the email.
    CredentialExists,
    /// An account with the email already exists.
    AccountExists,
    /// An un-used invitation for the email is still outstanding.
    PendingInvitation,
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DuplicateReason::CredentialExists => "a sign-in credential already exists for this email",
            DuplicateReason::AccountExists => "an account already exists for this email",
            DuplicateReason::PendingInvitation => "an unused invitation already exists for this email",
        };
        f.write_str(msg)
    }
}

/// The write rule a caller failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    AdminRequired,
    SuperAdminRequired,
    /// Changing one's own role or chapter.
    SelfRoleOrChapterChange,
    SelfDeletion,
    /// A review written on behalf of another reviewer.
    ReviewerMismatch,
    /// A chapter-scoped admin acting outside its chapter.
    OutsideChapter,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Denial::AdminRequired => "admin role required",
            Denial::SuperAdminRequired => "super admin role required",
            Denial::SelfRoleOrChapterChange => "accounts cannot change their own role or chapter",
            Denial::SelfDeletion => "accounts cannot delete themselves",
            Denial::ReviewerMismatch => "reviews may only be written by their reviewer",
            Denial::OutsideChapter => "target is outside the caller's chapter",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Account role is invalid: {0}")]
    AccountRoleInvalid(String),

    #[error("No invitation found for this sign-in")]
    NotInvited,

    #[error("Account setup incomplete: {0}")]
    AccountSetupIncomplete(String),

    #[error("Invitation code is invalid or has already been used")]
    InvalidInvite,

    #[error("Duplicate invitation: {0}")]
    DuplicateInvite(DuplicateReason),

    #[error("Permission denied: {0}")]
    PermissionDenied(Denial),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Only a store outage may be retried, and only by idempotent writes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::StoreUnavailable(_))
    }

    /// An account with a corrupt role must be signed out, not merely refused.
    pub fn forces_sign_out(&self) -> bool {
        matches!(self, CoreError::AccountRoleInvalid(_))
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::AccountRoleInvalid(_) => "ACCOUNT_ROLE_INVALID",
            CoreError::NotInvited => "NOT_INVITED",
            CoreError::AccountSetupIncomplete(_) => "ACCOUNT_SETUP_INCOMPLETE",
            CoreError::InvalidInvite => "INVALID_INVITE",
            CoreError::DuplicateInvite(_) => "DUPLICATE_INVITE",
            CoreError::PermissionDenied(_) => "PERMISSION_DENIED",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}
