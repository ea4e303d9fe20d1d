//! Invitation code value object.
//!
//! Codes are short, random, uppercase alphanumeric tokens, e.g. `Q7K2M9ZT`.
//! They are handed to the invitee out of band and typed back in during
//! registration, so input is normalized to uppercase before comparison.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shortest code accepted from input or configuration.
pub const MIN_CODE_LENGTH: usize = 6;

/// Longest code accepted from input or configuration.
pub const MAX_CODE_LENGTH: usize = 16;

/// A single-use invitation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Generates a random code of the given length.
    ///
    /// Lengths outside the accepted range are clamped.
    pub fn generate(length: usize) -> Self {
        let length = length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH);
        let mut rng = rand::rng();
        let code = (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Parses a code typed by a user.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is empty, has the wrong length,
    /// or contains anything but ASCII letters and digits.
    pub fn try_new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("invitation_code"));
        }

        let len = trimmed.chars().count();
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&len) {
            return Err(ValidationError::out_of_range(
                "invitation_code_length",
                MIN_CODE_LENGTH as i64,
                MAX_CODE_LENGTH as i64,
                len as i64,
            ));
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "invitation_code",
                "must contain only letters and digits",
            ));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for InvitationCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<InvitationCode> for String {
    fn from(code: InvitationCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_uppercase_alphanumeric() {
        for _ in 0..100 {
            let code = InvitationCode::generate(8);
            assert_eq!(code.as_str().len(), 8);
            assert!(code
                .as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_code_parses_back() {
        let code = InvitationCode::generate(8);
        assert_eq!(InvitationCode::try_new(code.as_str()), Ok(code));
    }

    #[test]
    fn generate_clamps_length() {
        assert_eq!(InvitationCode::generate(1).as_str().len(), MIN_CODE_LENGTH);
        assert_eq!(InvitationCode::generate(64).as_str().len(), MAX_CODE_LENGTH);
    }

    #[test]
    fn try_new_normalizes_to_uppercase() {
        let code = InvitationCode::try_new(" q7k2m9zt ").unwrap();
        assert_eq!(code.as_str(), "Q7K2M9ZT");
    }

    #[test]
    fn try_new_rejects_empty() {
        assert_eq!(
            InvitationCode::try_new(""),
            Err(ValidationError::empty_field("invitation_code"))
        );
    }

    #[test]
    fn try_new_rejects_punctuation() {
        assert!(InvitationCode::try_new("Q7K2-M9Z").is_err());
    }

    #[test]
    fn try_new_rejects_wrong_length() {
        assert!(InvitationCode::try_new("ABC").is_err());
        assert!(InvitationCode::try_new("ABCDEFGHIJKLMNOPQRSTU").is_err());
    }
}
