//! ConsumeInvitationHandler - Command handler redeeming an invitation code.
//!
//! Redemption is a conditional update in the repository, so of two
//! concurrent calls exactly one observes the pending state.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::AccountId;
use crate::domain::invitation::{Invitation, InvitationCode, InvitationError};
use crate::ports::{Clock, ConsumeOutcome, InvitationRepository};

/// Command to redeem a code for an account.
#[derive(Debug, Clone)]
pub struct ConsumeInvitationCommand {
    pub code: String,
    pub account_id: AccountId,
}

/// Handler for invitation redemption.
pub struct ConsumeInvitationHandler {
    invitations: Arc<dyn InvitationRepository>,
    clock: Arc<dyn Clock>,
}

impl ConsumeInvitationHandler {
    pub fn new(invitations: Arc<dyn InvitationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { invitations, clock }
    }

    pub async fn handle(&self, cmd: ConsumeInvitationCommand) -> Result<Invitation, InvitationError> {
        let code = InvitationCode::try_new(&cmd.code)?;
        let outcome = self
            .invitations
            .consume_if_pending(&code, cmd.account_id, self.clock.now(), &[])
            .await?;

        let invitation = consumed_or_error(code.clone(), outcome)?;
        info!(
            invitation_code = %code,
            account_id = %cmd.account_id,
            "Invitation consumed"
        );
        Ok(invitation)
    }
}

/// Maps a repository outcome to the caller-facing result.
pub(crate) fn consumed_or_error(
    code: InvitationCode,
    outcome: ConsumeOutcome,
) -> Result<Invitation, InvitationError> {
    match outcome {
        ConsumeOutcome::Consumed(invitation) => Ok(invitation),
        ConsumeOutcome::AlreadyConsumed => Err(InvitationError::already_used(code)),
        ConsumeOutcome::Expired => Err(InvitationError::expired(code)),
        ConsumeOutcome::NotFound => Err(InvitationError::not_found(code)),
    }
}
