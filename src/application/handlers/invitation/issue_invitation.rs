//! IssueInvitationHandler - Command handler for issuing invitation codes.
//!
//! Employee roles go to the invitation registry; the vendor role opens a
//! vendor invitation on the ledger. Both are written with their
//! notification intent in one repository call.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::foundation::{Actor, EmailAddress, Role, Timestamp};
use crate::domain::invitation::{
    EmployeeInvitation, Invitation, InvitationCode, InvitationError, InvitationGate,
    InvitationKind, InvitationLifecycle, InvitationPolicy, VendorInvitation,
};
use crate::domain::notification::{NotificationIntent, NotificationKind};
use crate::ports::{AccountRepository, Clock, InsertOutcome, InvitationRepository};

/// Command to issue an invitation.
#[derive(Debug, Clone)]
pub struct IssueInvitationCommand {
    pub actor: Actor,
    pub email: String,
    pub role: Role,
    /// Required when `role` is `Vendor`.
    pub vendor_name: Option<String>,
    pub phone: Option<String>,
}

/// Result of successful issuance.
#[derive(Debug, Clone)]
pub struct IssueInvitationResult {
    pub invitation: Invitation,
    /// Codes tried, including the one that stuck.
    pub attempts: u32,
}

/// Handler for issuing invitations.
pub struct IssueInvitationHandler {
    invitations: Arc<dyn InvitationRepository>,
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
    policy: InvitationPolicy,
}

impl IssueInvitationHandler {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        accounts: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
        policy: InvitationPolicy,
    ) -> Self {
        Self {
            invitations,
            accounts,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: IssueInvitationCommand,
    ) -> Result<IssueInvitationResult, InvitationError> {
        // 1. Only admins and managers hand out codes
        if !cmd.actor.role.can_issue_invitations() {
            return Err(InvitationError::forbidden(cmd.actor.role, "issue invitations"));
        }

        let email = EmailAddress::try_new(&cmd.email)?;
        let now = self.clock.now();

        // 2. An existing account or a redeemed invitation means the person is already in
        if self.accounts.find_by_email(&email).await?.is_some()
            || self.invitations.has_consumed_for_email(&email).await?
        {
            return Err(InvitationError::user_already_exists(email.normalized()));
        }

        // 3. Only an active invitation blocks; expired ones may be replaced
        if self
            .invitations
            .find_active_for_email(&email, now)
            .await?
            .is_some()
        {
            return Err(InvitationError::duplicate_active(email.normalized()));
        }

        // 4. Insert with a fresh code, retrying collisions up to the bound
        for attempt in 1..=self.policy.max_code_attempts {
            let code = InvitationCode::generate(self.policy.code_length);
            let invitation = self.build(&cmd, code, email.clone(), now)?;
            let intent = self.intent_for(&invitation, &cmd.actor);

            match self.invitations.insert(&invitation, &[intent]).await? {
                InsertOutcome::Inserted => {
                    info!(
                        invitation_code = %invitation.code(),
                        kind = invitation.kind().as_str(),
                        role = %invitation.role(),
                        issued_by = %cmd.actor.account_id,
                        "Invitation issued"
                    );
                    return Ok(IssueInvitationResult {
                        invitation,
                        attempts: attempt,
                    });
                }
                InsertOutcome::CodeCollision => {
                    debug!(attempt, "Invitation code collision, regenerating");
                }
                InsertOutcome::ActiveInvitationExists => {
                    return Err(InvitationError::duplicate_active(email.normalized()));
                }
            }
        }

        error!(
            attempts = self.policy.max_code_attempts,
            code_length = self.policy.code_length,
            "Invitation code space exhausted"
        );
        Err(InvitationError::code_space_exhausted(
            self.policy.max_code_attempts,
        ))
    }

    fn build(
        &self,
        cmd: &IssueInvitationCommand,
        code: InvitationCode,
        email: EmailAddress,
        now: Timestamp,
    ) -> Result<Invitation, InvitationError> {
        let kind = if cmd.role == Role::Vendor {
            InvitationKind::Vendor
        } else {
            InvitationKind::Employee
        };
        let lifecycle = InvitationLifecycle::issue(
            code,
            email,
            cmd.actor.account_id,
            now,
            self.policy.expires_at(kind, now),
        );

        Ok(match kind {
            InvitationKind::Employee => {
                Invitation::Employee(EmployeeInvitation::new(lifecycle, cmd.role)?)
            }
            InvitationKind::Vendor => Invitation::Vendor(VendorInvitation::new(
                lifecycle,
                cmd.vendor_name.clone().unwrap_or_default(),
                cmd.phone.clone(),
            )?),
        })
    }

    fn intent_for(&self, invitation: &Invitation, actor: &Actor) -> NotificationIntent {
        let lifecycle = invitation.lifecycle();
        let (recipient_name, kind) = match invitation {
            Invitation::Employee(inv) => (
                lifecycle.email.as_str().to_string(),
                NotificationKind::EmployeeInvitation {
                    code: lifecycle.code.clone(),
                    role: inv.role,
                    invited_by: actor.display_name.clone(),
                    expires_at: lifecycle.expires_at,
                },
            ),
            Invitation::Vendor(inv) => (
                inv.vendor_name.clone(),
                NotificationKind::VendorInvitation {
                    code: lifecycle.code.clone(),
                    vendor_name: inv.vendor_name.clone(),
                    expires_at: lifecycle.expires_at,
                },
            ),
        };
        NotificationIntent::new(
            lifecycle.email.clone(),
            recipient_name,
            kind,
            lifecycle.created_at,
        )
    }
}
