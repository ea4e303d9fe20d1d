//! RegisterEmployeeHandler - Command handler for invitation-gated employee sign-up.
//!
//! The account is written first, then the invitation is redeemed with a
//! conditional update. Losing that race deletes the fresh account again.

use std::sync::Arc;

use secrecy::Secret;
use tracing::{error, info, warn};

use crate::application::handlers::invitation::consumed_or_error;
use crate::domain::account::{validate_password, Account, NewAccount};
use crate::domain::foundation::EmailAddress;
use crate::domain::invitation::{
    EmployeeInvitation, InvitationCode, InvitationError, InvitationGate,
};
use crate::ports::{AccountRepository, Clock, InvitationRepository, PasswordHasher};

/// Command to register with an employee invitation.
#[derive(Debug, Clone)]
pub struct RegisterEmployeeCommand {
    pub code: String,
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Result of successful registration.
#[derive(Debug, Clone)]
pub struct RegisterEmployeeResult {
    pub account: Account,
    pub invitation: EmployeeInvitation,
}

/// Handler for employee registration.
pub struct RegisterEmployeeHandler {
    invitations: Arc<dyn InvitationRepository>,
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl RegisterEmployeeHandler {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invitations,
            accounts,
            hasher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterEmployeeCommand,
    ) -> Result<RegisterEmployeeResult, InvitationError> {
        // 1. Validate input before touching storage
        let code = InvitationCode::try_new(&cmd.code)?;
        let email = EmailAddress::try_new(&cmd.email)?;
        validate_password(&cmd.password)?;
        let now = self.clock.now();

        // 2. Load and check the invitation
        let invitation = self
            .invitations
            .find_by_code(&code)
            .await?
            .ok_or_else(|| InvitationError::not_found(code.clone()))?
            .into_employee()?;
        invitation.validate(now)?;
        invitation.ensure_email_matches(&email)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(InvitationError::user_already_exists(email.normalized()));
        }

        // 3. Build the account; the role comes from the invitation
        let password_hash = self.hasher.hash(&cmd.password)?;
        let account = Account::create(
            NewAccount {
                username: cmd.username,
                email,
                password_hash,
                role: invitation.role,
                first_name: cmd.first_name,
                last_name: cmd.last_name,
                onboarding_completed: false,
                invitation_code: code.clone(),
            },
            now,
        )?;

        // 4. Persist the account
        self.accounts.insert(&account).await?;

        // 5. Redeem the invitation; compensate if someone else got there first
        let consumed = match self
            .invitations
            .consume_if_pending(&code, account.id, now, &[])
            .await
        {
            Ok(outcome) => consumed_or_error(code.clone(), outcome),
            Err(e) => Err(e.into()),
        };

        let invitation = match consumed {
            Ok(invitation) => invitation.into_employee()?,
            Err(cause) => {
                if let Err(e) = self.accounts.delete(&account.id).await {
                    error!(
                        account_id = %account.id,
                        invitation_code = %code,
                        error = %e,
                        "Failed to remove account after losing invitation redemption"
                    );
                    return Err(InvitationError::partially_onboarded(
                        account.id,
                        "consume_invitation",
                    ));
                }
                warn!(
                    account_id = %account.id,
                    invitation_code = %code,
                    error = %cause,
                    "Registration rolled back"
                );
                return Err(cause);
            }
        };

        info!(
            account_id = %account.id,
            invitation_code = %code,
            role = %account.role,
            "Employee registered"
        );

        Ok(RegisterEmployeeResult {
            account,
            invitation,
        })
    }
}
