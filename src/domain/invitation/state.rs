//! Invitation lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle state shared by employee and vendor invitations.
///
/// Only `Pending` and `Consumed` are ever written to storage. `Expired`
/// is derived at read time from `expires_at` and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationState {
    Pending,
    Consumed,
    Expired,
}

impl InvitationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationState::Pending => "pending",
            InvitationState::Consumed => "consumed",
            InvitationState::Expired => "expired",
        }
    }

    /// Label shown on the invitation ledger (`pending`, `completed`, `expired`).
    pub fn ledger_label(&self) -> &'static str {
        match self {
            InvitationState::Pending => "pending",
            InvitationState::Consumed => "completed",
            InvitationState::Expired => "expired",
        }
    }

    /// Parses a persisted state. `expired` is rejected because it is never stored.
    pub fn parse_stored(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(InvitationState::Pending),
            "consumed" => Ok(InvitationState::Consumed),
            other => Err(ValidationError::invalid_format(
                "invitation_state",
                format!("'{}' is not a persisted invitation state", other),
            )),
        }
    }
}

impl fmt::Display for InvitationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for InvitationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvitationState::*;
        matches!((self, target), (Pending, Consumed) | (Pending, Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InvitationState::*;
        match self {
            Pending => vec![Consumed, Expired],
            Consumed | Expired => vec![],
        }
    }
}
