//! Portal roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Role carried by every account and every invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
    Vendor,
}

impl Role {
    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Vendor => "vendor",
        }
    }

    /// Admins and managers may send invitations.
    pub fn can_issue_invitations(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Only admins may approve or reject compliance documents.
    pub fn can_review_documents(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// True for roles held by internal staff (everything but vendors).
    pub fn is_internal(&self) -> bool {
        !matches!(self, Role::Vendor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            "vendor" => Ok(Role::Vendor),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}
