//! The authenticated caller of a workflow operation.

use super::{AccountId, Role};

/// Who is performing an operation.
///
/// Resolved by the HTTP layer from the session; handlers only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub account_id: AccountId,
    pub role: Role,
    pub display_name: String,
}

impl Actor {
    pub fn new(account_id: AccountId, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            account_id,
            role,
            display_name: display_name.into(),
        }
    }
}
