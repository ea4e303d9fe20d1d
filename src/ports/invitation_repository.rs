//! Invitation repository port.
//!
//! Storage for both invitation kinds. Writes that change state also persist
//! the notification intents they produce, in the same unit of work.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, EmailAddress, Timestamp};
use crate::domain::invitation::{Invitation, InvitationCode};
use crate::domain::notification::NotificationIntent;

/// Result of inserting a new invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The generated code is already taken; the caller should retry.
    CodeCollision,
    /// Another active invitation for the email was committed first.
    ActiveInvitationExists,
}

/// Result of the conditional consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// This call won; carries the invitation as now stored.
    Consumed(Invitation),
    AlreadyConsumed,
    Expired,
    NotFound,
}

/// Repository port for invitations.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Inserts a pending invitation together with its intents.
    ///
    /// Must re-check, atomically with the insert, that no other invitation
    /// for the same email is active at `invitation.created_at`.
    async fn insert(
        &self,
        invitation: &Invitation,
        intents: &[NotificationIntent],
    ) -> Result<InsertOutcome, DomainError>;

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Invitation>, DomainError>;

    /// The pending, unexpired invitation for the email, if any.
    async fn find_active_for_email(
        &self,
        email: &EmailAddress,
        now: Timestamp,
    ) -> Result<Option<Invitation>, DomainError>;

    /// Whether any invitation for the email has been redeemed.
    async fn has_consumed_for_email(&self, email: &EmailAddress) -> Result<bool, DomainError>;

    /// Atomically moves a pending, unexpired invitation to consumed and
    /// records the audit link to `account_id`.
    ///
    /// Compare-and-set: of two concurrent calls on one code exactly one
    /// observes `Consumed`. Intents are written only when this call wins.
    async fn consume_if_pending(
        &self,
        code: &InvitationCode,
        account_id: AccountId,
        now: Timestamp,
        intents: &[NotificationIntent],
    ) -> Result<ConsumeOutcome, DomainError>;
}
