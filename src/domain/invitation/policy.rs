//! Invitation issuance policy.

use crate::domain::foundation::Timestamp;

use super::InvitationKind;

/// Tunables for invitation issuance, built from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvitationPolicy {
    /// Lifetime of an employee invitation.
    pub employee_ttl_days: i64,
    /// Lifetime of a vendor invitation.
    pub vendor_ttl_days: i64,
    /// Length of generated codes.
    pub code_length: usize,
    /// How many codes to try before giving up on collisions.
    pub max_code_attempts: u32,
}

impl Default for InvitationPolicy {
    fn default() -> Self {
        Self {
            employee_ttl_days: 7,
            vendor_ttl_days: 30,
            code_length: 8,
            max_code_attempts: 5,
        }
    }
}

impl InvitationPolicy {
    /// Expiry for an invitation of the given kind issued at `issued_at`.
    pub fn expires_at(&self, kind: InvitationKind, issued_at: Timestamp) -> Timestamp {
        match kind {
            InvitationKind::Employee => issued_at.add_days(self.employee_ttl_days),
            InvitationKind::Vendor => issued_at.add_days(self.vendor_ttl_days),
        }
    }
}
