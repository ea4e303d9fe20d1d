//! ValidateInvitationHandler - Query handler checking whether a code can be redeemed.
//!
//! Expiry is evaluated against the injected clock at call time and never
//! written back.

use std::sync::Arc;

use crate::domain::invitation::{
    Invitation, InvitationCode, InvitationError, InvitationGate, InvitationState,
};
use crate::ports::{Clock, InvitationRepository};

/// Query for a code's redeemability.
#[derive(Debug, Clone)]
pub struct ValidateInvitationQuery {
    pub code: String,
}

/// A redeemable invitation.
#[derive(Debug, Clone)]
pub struct ValidateInvitationResult {
    pub invitation: Invitation,
}

/// Ledger view of an invitation, whatever its state.
#[derive(Debug, Clone)]
pub struct InvitationStatusView {
    pub invitation: Invitation,
    pub state: InvitationState,
    /// `pending`, `completed` or `expired`.
    pub label: &'static str,
}

/// Handler for invitation validation and status lookups.
pub struct ValidateInvitationHandler {
    invitations: Arc<dyn InvitationRepository>,
    clock: Arc<dyn Clock>,
}

impl ValidateInvitationHandler {
    pub fn new(invitations: Arc<dyn InvitationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { invitations, clock }
    }

    /// Fails with `NotFound`, `Expired` or `AlreadyUsed`, in that order.
    pub async fn handle(
        &self,
        query: ValidateInvitationQuery,
    ) -> Result<ValidateInvitationResult, InvitationError> {
        let invitation = self.load(&query.code).await?;
        invitation.validate(self.clock.now())?;
        Ok(ValidateInvitationResult { invitation })
    }

    /// Reports the effective state without failing on terminal ones.
    pub async fn status(&self, code: &str) -> Result<InvitationStatusView, InvitationError> {
        let invitation = self.load(code).await?;
        let state = invitation.effective_state(self.clock.now());
        Ok(InvitationStatusView {
            invitation,
            state,
            label: state.ledger_label(),
        })
    }

    async fn load(&self, code: &str) -> Result<Invitation, InvitationError> {
        let code = InvitationCode::try_new(code)?;
        self.invitations
            .find_by_code(&code)
            .await?
            .ok_or_else(|| InvitationError::not_found(code))
    }
}
