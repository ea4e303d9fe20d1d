//! Compliance document review status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Review status of a compliance document.
///
/// `Approved` and `Rejected` are terminal. A rejected document is kept for
/// audit; the vendor uploads a new record instead of reopening it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }

    /// Capitalized form for subject lines.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Approved => "Approved",
            DocumentStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "approved" => Ok(DocumentStatus::Approved),
            "rejected" => Ok(DocumentStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "document_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for DocumentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DocumentStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DocumentStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_either_decision() {
        assert_eq!(
            DocumentStatus::Pending.valid_transitions(),
            vec![DocumentStatus::Approved, DocumentStatus::Rejected]
        );
    }

    #[test]
    fn decisions_are_terminal() {
        assert!(DocumentStatus::Approved.is_terminal());
        assert!(DocumentStatus::Rejected.is_terminal());
        assert!(!DocumentStatus::Approved.can_transition_to(&DocumentStatus::Rejected));
        assert!(!DocumentStatus::Rejected.can_transition_to(&DocumentStatus::Pending));
    }

    #[test]
    fn parses_persisted_values() {
        assert_eq!("approved".parse::<DocumentStatus>(), Ok(DocumentStatus::Approved));
        assert!("Approved".parse::<DocumentStatus>().is_err());
    }
}
