//! Invitation aggregate.
//!
//! Employee and vendor invitations differ only in their payload. Both embed
//! the same `InvitationLifecycle`, and both expose validation through the
//! `InvitationGate` capability so the onboarding paths never branch on role
//! strings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AccountId, EmailAddress, Role, StateMachine, Timestamp, ValidationError,
};

use super::{InvitationCode, InvitationError, InvitationState};

/// Which onboarding path an invitation opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationKind {
    Employee,
    Vendor,
}

impl InvitationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationKind::Employee => "employee",
            InvitationKind::Vendor => "vendor",
        }
    }
}

/// State and timing shared by every invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationLifecycle {
    pub code: InvitationCode,
    pub email: EmailAddress,
    pub issued_by: AccountId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Persisted state; never `Expired`.
    pub state: InvitationState,
    /// Account created by redeeming this invitation. Set once, never cleared.
    pub consumed_by: Option<AccountId>,
    pub consumed_at: Option<Timestamp>,
}

impl InvitationLifecycle {
    /// Starts a pending lifecycle.
    pub fn issue(
        code: InvitationCode,
        email: EmailAddress,
        issued_by: AccountId,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            code,
            email,
            issued_by,
            created_at,
            expires_at,
            state: InvitationState::Pending,
            consumed_by: None,
            consumed_at: None,
        }
    }

    /// An invitation is valid up to and including `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Pending and not yet expired.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.state == InvitationState::Pending && !self.is_expired_at(now)
    }

    /// State as observed at `now`.
    ///
    /// A consumed invitation stays consumed; a pending one past its expiry
    /// reads as expired without anything being written.
    pub fn effective_state(&self, now: Timestamp) -> InvitationState {
        match self.state {
            InvitationState::Pending if self.is_expired_at(now) => InvitationState::Expired,
            state => state,
        }
    }

    /// Checks the invitation can be redeemed at `now`.
    ///
    /// Expiry is checked first, so an expired code reports `Expired`
    /// whether or not it was used.
    pub fn validate(&self, now: Timestamp) -> Result<(), InvitationError> {
        if self.is_expired_at(now) || self.state == InvitationState::Expired {
            return Err(InvitationError::expired(self.code.clone()));
        }
        if self.state == InvitationState::Consumed {
            return Err(InvitationError::already_used(self.code.clone()));
        }
        Ok(())
    }

    /// Redeems the invitation for `account_id`.
    pub fn consume(&mut self, account_id: AccountId, now: Timestamp) -> Result<(), InvitationError> {
        self.validate(now)?;
        self.state = self.state.transition_to(InvitationState::Consumed)?;
        self.consumed_by = Some(account_id);
        self.consumed_at = Some(now);
        Ok(())
    }
}

/// Invitation for internal staff. The registrant inherits `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInvitation {
    pub lifecycle: InvitationLifecycle,
    pub role: Role,
}

impl EmployeeInvitation {
    /// # Errors
    ///
    /// Vendor accounts are only created through vendor invitations.
    pub fn new(lifecycle: InvitationLifecycle, role: Role) -> Result<Self, ValidationError> {
        if !role.is_internal() {
            return Err(ValidationError::invalid_format(
                "role",
                "employee invitations cannot carry the vendor role",
            ));
        }
        Ok(Self { lifecycle, role })
    }
}

/// Invitation for an external vendor company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInvitation {
    pub lifecycle: InvitationLifecycle,
    pub vendor_name: String,
    pub phone: Option<String>,
}

impl VendorInvitation {
    pub fn new(
        lifecycle: InvitationLifecycle,
        vendor_name: impl Into<String>,
        phone: Option<String>,
    ) -> Result<Self, ValidationError> {
        let vendor_name = vendor_name.into().trim().to_string();
        if vendor_name.is_empty() {
            return Err(ValidationError::empty_field("vendor_name"));
        }
        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Ok(Self {
            lifecycle,
            vendor_name,
            phone,
        })
    }

    /// Status label shown on the vendor invitation ledger.
    pub fn status_label(&self, now: Timestamp) -> &'static str {
        self.lifecycle.effective_state(now).ledger_label()
    }
}

/// Either kind of invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invitation {
    Employee(EmployeeInvitation),
    Vendor(VendorInvitation),
}

impl Invitation {
    pub fn kind(&self) -> InvitationKind {
        match self {
            Invitation::Employee(_) => InvitationKind::Employee,
            Invitation::Vendor(_) => InvitationKind::Vendor,
        }
    }

    /// Role the redeemed account receives.
    pub fn role(&self) -> Role {
        match self {
            Invitation::Employee(inv) => inv.role,
            Invitation::Vendor(_) => Role::Vendor,
        }
    }

    pub fn lifecycle_mut(&mut self) -> &mut InvitationLifecycle {
        match self {
            Invitation::Employee(inv) => &mut inv.lifecycle,
            Invitation::Vendor(inv) => &mut inv.lifecycle,
        }
    }

    pub fn into_employee(self) -> Result<EmployeeInvitation, InvitationError> {
        match self {
            Invitation::Employee(inv) => Ok(inv),
            Invitation::Vendor(inv) => Err(InvitationError::wrong_kind(
                inv.lifecycle.code,
                InvitationKind::Employee,
            )),
        }
    }

    pub fn into_vendor(self) -> Result<VendorInvitation, InvitationError> {
        match self {
            Invitation::Vendor(inv) => Ok(inv),
            Invitation::Employee(inv) => Err(InvitationError::wrong_kind(
                inv.lifecycle.code,
                InvitationKind::Vendor,
            )),
        }
    }
}

/// Capability shared by both invitation kinds: validate before redeeming.
pub trait InvitationGate {
    fn lifecycle(&self) -> &InvitationLifecycle;

    fn code(&self) -> &InvitationCode {
        &self.lifecycle().code
    }

    fn email(&self) -> &EmailAddress {
        &self.lifecycle().email
    }

    fn effective_state(&self, now: Timestamp) -> InvitationState {
        self.lifecycle().effective_state(now)
    }

    fn validate(&self, now: Timestamp) -> Result<(), InvitationError> {
        self.lifecycle().validate(now)
    }

    /// Registrant email must equal the invited email, ignoring case.
    fn ensure_email_matches(&self, submitted: &EmailAddress) -> Result<(), InvitationError> {
        if self.email().matches(submitted) {
            Ok(())
        } else {
            Err(InvitationError::email_mismatch(self.code().clone()))
        }
    }
}

impl InvitationGate for EmployeeInvitation {
    fn lifecycle(&self) -> &InvitationLifecycle {
        &self.lifecycle
    }
}

impl InvitationGate for VendorInvitation {
    fn lifecycle(&self) -> &InvitationLifecycle {
        &self.lifecycle
    }
}

impl InvitationGate for Invitation {
    fn lifecycle(&self) -> &InvitationLifecycle {
        match self {
            Invitation::Employee(inv) => &inv.lifecycle,
            Invitation::Vendor(inv) => &inv.lifecycle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifecycle(now: Timestamp, ttl_days: i64) -> InvitationLifecycle {
        InvitationLifecycle::issue(
            InvitationCode::try_new("Q7K2M9ZT").unwrap(),
            EmailAddress::try_new("v@x.com").unwrap(),
            AccountId::new(),
            now,
            now.add_days(ttl_days),
        )
    }

    #[test]
    fn fresh_invitation_validates() {
        let now = Timestamp::now();
        assert!(lifecycle(now, 7).validate(now).is_ok());
    }

    #[test]
    fn invitation_is_valid_at_exact_expiry() {
        let now = Timestamp::now();
        let lc = lifecycle(now, 7);
        assert!(lc.validate(lc.expires_at).is_ok());
        assert!(lc.validate(lc.expires_at.plus_secs(1)).is_err());
    }

    #[test]
    fn expired_wins_over_already_used() {
        let now = Timestamp::now();
        let mut lc = lifecycle(now, 7);
        lc.consume(AccountId::new(), now).unwrap();

        let later = now.add_days(8);
        assert_eq!(
            lc.validate(later),
            Err(InvitationError::expired(lc.code.clone()))
        );
        assert_eq!(
            lc.validate(now),
            Err(InvitationError::already_used(lc.code.clone()))
        );
    }

    #[test]
    fn expiry_is_derived_not_stored() {
        let now = Timestamp::now();
        let lc = lifecycle(now, 30);
        let later = now.add_days(31);

        assert_eq!(lc.effective_state(later), InvitationState::Expired);
        assert_eq!(lc.state, InvitationState::Pending);
    }

    #[test]
    fn consume_records_audit_link_once() {
        let now = Timestamp::now();
        let mut lc = lifecycle(now, 7);
        let account = AccountId::new();

        lc.consume(account, now).unwrap();
        assert_eq!(lc.state, InvitationState::Consumed);
        assert_eq!(lc.consumed_by, Some(account));

        let second = lc.consume(AccountId::new(), now);
        assert!(matches!(second, Err(InvitationError::AlreadyUsed(_))));
        assert_eq!(lc.consumed_by, Some(account));
    }

    #[test]
    fn consumed_invitation_stays_consumed_after_expiry() {
        let now = Timestamp::now();
        let mut lc = lifecycle(now, 7);
        lc.consume(AccountId::new(), now).unwrap();
        assert_eq!(lc.effective_state(now.add_days(30)), InvitationState::Consumed);
    }

    #[test]
    fn email_match_ignores_case() {
        let now = Timestamp::now();
        let inv = EmployeeInvitation::new(lifecycle(now, 7), Role::Employee).unwrap();

        assert!(inv
            .ensure_email_matches(&EmailAddress::try_new("V@X.COM").unwrap())
            .is_ok());
        assert!(matches!(
            inv.ensure_email_matches(&EmailAddress::try_new("w@x.com").unwrap()),
            Err(InvitationError::EmailMismatch(_))
        ));
    }

    #[test]
    fn employee_invitation_rejects_vendor_role() {
        let now = Timestamp::now();
        assert!(EmployeeInvitation::new(lifecycle(now, 7), Role::Vendor).is_err());
    }

    #[test]
    fn vendor_invitation_requires_name() {
        let now = Timestamp::now();
        assert!(VendorInvitation::new(lifecycle(now, 30), "  ", None).is_err());
    }

    #[test]
    fn vendor_status_label_tracks_lifecycle() {
        let now = Timestamp::now();
        let mut inv = VendorInvitation::new(lifecycle(now, 30), "Acme", None).unwrap();

        assert_eq!(inv.status_label(now), "pending");
        assert_eq!(inv.status_label(now.add_days(31)), "expired");

        inv.lifecycle.consume(AccountId::new(), now).unwrap();
        assert_eq!(inv.status_label(now.add_days(31)), "completed");
    }

    #[test]
    fn kind_conversions_reject_other_path() {
        let now = Timestamp::now();
        let vendor = Invitation::Vendor(
            VendorInvitation::new(lifecycle(now, 30), "Acme", None).unwrap(),
        );
        assert_eq!(vendor.role(), Role::Vendor);
        assert!(matches!(
            vendor.into_employee(),
            Err(InvitationError::WrongInvitationKind { .. })
        ));
    }
}
