//! Email address value object.
//!
//! Addresses keep the casing they were entered with; comparisons and
//! uniqueness checks go through the lowercase normalized form.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates an address from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the value is empty, contains whitespace,
    /// or is not of the form `local@domain`.
    pub fn try_new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "email",
                "must not contain whitespace",
            ));
        }

        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format(
                "email",
                "expected exactly one @ between local part and domain",
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ValidationError::invalid_format(
                "email",
                format!("invalid domain '{}'", domain),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase form used for lookups and uniqueness.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality.
    pub fn matches(&self, other: &EmailAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_valid_address() {
        let email = EmailAddress::try_new("  Jane.Doe@Example.com ").unwrap();
        assert_eq!(email.as_str(), "Jane.Doe@Example.com");
        assert_eq!(email.normalized(), "jane.doe@example.com");
    }

    #[test]
    fn rejects_empty_address() {
        assert_eq!(
            EmailAddress::try_new("   "),
            Err(ValidationError::empty_field("email"))
        );
    }

    #[test]
    fn rejects_missing_at_symbol() {
        assert!(EmailAddress::try_new("jane.example.com").is_err());
    }

    #[test]
    fn rejects_double_at_symbol() {
        assert!(EmailAddress::try_new("jane@@example.com").is_err());
        assert!(EmailAddress::try_new("jane@x@example.com").is_err());
    }

    #[test]
    fn rejects_domain_without_dot() {
        assert!(EmailAddress::try_new("jane@localhost").is_err());
    }

    #[test]
    fn matches_ignores_case_only() {
        let a = EmailAddress::try_new("v@x.com").unwrap();
        let b = EmailAddress::try_new("V@X.COM").unwrap();
        let c = EmailAddress::try_new("w@x.com").unwrap();

        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<EmailAddress, _> = serde_json::from_str("\"a@b.io\"");
        let bad: Result<EmailAddress, _> = serde_json::from_str("\"nope\"");
        assert!(ok.is_ok());
        assert!(bad.is_err());
    }
}
