//! Invitation policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::invitation::{InvitationPolicy, MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Invitation lifetimes and code generation
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationConfig {
    /// Days an employee invitation stays valid
    #[serde(default = "default_employee_ttl_days")]
    pub employee_ttl_days: i64,

    /// Days a vendor invitation stays valid
    #[serde(default = "default_vendor_ttl_days")]
    pub vendor_ttl_days: i64,

    /// Generated code length
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Attempts before giving up on a colliding code
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
}

impl InvitationConfig {
    /// Build the domain policy handed to the handlers
    pub fn to_policy(&self) -> InvitationPolicy {
        InvitationPolicy {
            employee_ttl_days: self.employee_ttl_days,
            vendor_ttl_days: self.vendor_ttl_days,
            code_length: self.code_length,
            max_code_attempts: self.max_code_attempts,
        }
    }

    /// Validate invitation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.employee_ttl_days <= 0 || self.vendor_ttl_days <= 0 {
            return Err(ValidationError::InvalidInvitationTtl);
        }
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(ValidationError::InvalidCodeLength);
        }
        if self.max_code_attempts == 0 {
            return Err(ValidationError::InvalidCodeAttempts);
        }
        Ok(())
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            employee_ttl_days: default_employee_ttl_days(),
            vendor_ttl_days: default_vendor_ttl_days(),
            code_length: default_code_length(),
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

fn default_employee_ttl_days() -> i64 {
    7
}

fn default_vendor_ttl_days() -> i64 {
    30
}

fn default_code_length() -> usize {
    8
}

fn default_max_code_attempts() -> u32 {
    5
}
