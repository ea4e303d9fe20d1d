//! Account aggregate.
//!
//! Accounts are only ever created by redeeming an invitation; the role is
//! copied from the invitation, never chosen by the registrant.

use crate::domain::foundation::{AccountId, EmailAddress, Role, Timestamp, ValidationError};
use crate::domain::invitation::InvitationCode;

use super::HashedPassword;

/// A portal login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: EmailAddress,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub onboarding_completed: bool,
    /// Invitation redeemed to create this account.
    pub invitation_code: InvitationCode,
    pub created_at: Timestamp,
}

/// Input for [`Account::create`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: EmailAddress,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub onboarding_completed: bool,
    pub invitation_code: InvitationCode,
}

impl Account {
    /// Builds an active account.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a malformed username or a missing name.
    pub fn create(new: NewAccount, now: Timestamp) -> Result<Self, ValidationError> {
        let username = validate_username(&new.username)?;
        let first_name = required("first_name", &new.first_name)?;
        let last_name = required("last_name", &new.last_name)?;

        Ok(Self {
            id: AccountId::new(),
            username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            first_name,
            last_name,
            is_active: true,
            onboarding_completed: new.onboarding_completed,
            invitation_code: new.invitation_code,
            created_at: now,
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

/// Usernames are 3-64 characters of letters, digits, `.`, `_`, `-` or `@`.
fn validate_username(value: &str) -> Result<String, ValidationError> {
    let username = required("username", value)?;
    let len = username.chars().count();
    if !(3..=64).contains(&len) {
        return Err(ValidationError::out_of_range("username", 3, 64, len as i64));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'))
    {
        return Err(ValidationError::invalid_format(
            "username",
            "only letters, digits and . _ - @ are allowed",
        ));
    }
    Ok(username)
}
