//! Invitation validation and code generation.

use rand::Rng;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::roles::{Role, VALID_ROLES};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Number of characters in an invitation code.
pub const INVITE_CODE_LENGTH: usize = 6;

/// Alphabet for invitation codes. Uppercase only so codes survive being read
/// aloud or retyped.
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Maximum length for invitee and account display names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a chapter name.
pub const MAX_CHAPTER_LENGTH: usize = 100;

/* --------------------------------------------------------------------------
Normalization
-------------------------------------------------------------------------- */

/// Emails are matched case-insensitively and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Codes are compared uppercased so `ab12cd` redeems `AB12CD`.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Generate a short random invitation code.
///
/// Codes are not checked for uniqueness across invitations; redemption always
/// requires the matching email as well.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..INVITE_CODE_CHARSET.len());
            INVITE_CODE_CHARSET[idx] as char
        })
        .collect()
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Invitation fields after normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvitation {
    pub email: String,
    pub name: String,
    pub role: Role,
    /// `None` only for super admin invitations without a chapter.
    pub chapter: Option<String>,
}

/// Validate and normalize an email address.
pub fn validate_email(email: &str) -> Result<String, CoreError> {
    let normalized = normalize_email(email);
    if !normalized.validate_email() {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(normalized)
}

/// Validate a display name: non-blank and at most [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a role name supplied by a client.
pub fn validate_role(role: &str) -> Result<Role, CoreError> {
    Role::parse(role.trim()).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    })
}

/// Validate the chapter for a role. Blank chapters are treated as absent and
/// are only accepted for super admins.
pub fn validate_chapter(role: Role, chapter: Option<&str>) -> Result<Option<String>, CoreError> {
    let chapter = chapter.map(str::trim).filter(|c| !c.is_empty());
    match chapter {
        Some(c) if c.chars().count() > MAX_CHAPTER_LENGTH => Err(CoreError::Validation(format!(
            "Chapter exceeds maximum length of {MAX_CHAPTER_LENGTH} characters"
        ))),
        Some(c) => Ok(Some(c.to_string())),
        None if role.requires_chapter() => Err(CoreError::Validation(format!(
            "A chapter is required for role '{role}'"
        ))),
        None => Ok(None),
    }
}

/// Validate every field of an invitation request.
pub fn validate_invitation(
    email: &str,
    name: &str,
    role: &str,
    chapter: Option<&str>,
) -> Result<ValidatedInvitation, CoreError> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;
    let role = validate_role(role)?;
    let chapter = validate_chapter(role, chapter)?;
    Ok(ValidatedInvitation {
        email,
        name,
        role,
        chapter,
    })
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
