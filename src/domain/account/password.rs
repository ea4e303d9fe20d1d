//! Credential value objects.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// A password hash in PHC string format.
///
/// Never holds plaintext. `Debug` is redacted so hashes stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// Checks a plaintext password before it is hashed.
pub fn validate_password(password: &Secret<String>) -> Result<(), ValidationError> {
    let value = password.expose_secret();
    if value.is_empty() {
        return Err(ValidationError::empty_field("password"));
    }
    let len = value.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::out_of_range(
            "password_length",
            MIN_PASSWORD_LENGTH as i64,
            MAX_PASSWORD_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(())
}
