//! Notification outbox port.
//!
//! Intents are written by state transitions and drained by the relay.
//! Delivery is at-most-once: an entry is claimed before it is sent and is
//! never handed out again, whatever the outcome. A claim that is never
//! resolved (relay crash, failed status write) is finalized as failed by the
//! retention sweep once it is older than the cutoff.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::notification::NotificationIntent;

/// Status of an outbox entry in the delivery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Written, waiting for the relay.
    Pending,
    /// Handed to a relay; delivery in progress.
    Claimed,
    /// Accepted by the dispatcher.
    Sent,
    /// Dispatcher refused it. Not retried.
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Claimed => "claimed",
            OutboxStatus::Sent => "sent",
            OutboxStatus::Failed => "failed",
        }
    }
}

/// An entry in the notification outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    /// Same as the intent id.
    pub id: Uuid,
    pub intent: NotificationIntent,
    pub status: OutboxStatus,
    pub created_at: DateTime<Utc>,
    /// When a relay claimed the entry.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When the entry reached `Sent` or `Failed`.
    pub processed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl OutboxEntry {
    pub fn new(intent: NotificationIntent) -> Self {
        Self {
            id: intent.id,
            created_at: *intent.created_at.as_datetime(),
            intent,
            status: OutboxStatus::Pending,
            claimed_at: None,
            processed_at: None,
            last_error: None,
        }
    }

    pub fn mark_claimed(&mut self, at: DateTime<Utc>) {
        self.status = OutboxStatus::Claimed;
        self.claimed_at = Some(at);
    }

    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.status = OutboxStatus::Sent;
        self.processed_at = Some(at);
    }

    pub fn mark_failed(&mut self, error: impl Into<String>, at: DateTime<Utc>) {
        self.status = OutboxStatus::Failed;
        self.processed_at = Some(at);
        self.last_error = Some(error.into());
    }

    /// True for a claim that was never resolved and is older than `cutoff`.
    pub fn is_abandoned_claim(&self, cutoff: DateTime<Utc>) -> bool {
        self.status == OutboxStatus::Claimed
            && self.claimed_at.unwrap_or(self.created_at) < cutoff
    }

    /// True for a sent or failed entry processed before `cutoff`.
    pub fn is_expired_record(&self, cutoff: DateTime<Utc>) -> bool {
        matches!(self.status, OutboxStatus::Sent | OutboxStatus::Failed)
            && self.processed_at.is_some_and(|processed| processed < cutoff)
    }
}

/// Error recorded on claims finalized by the retention sweep.
pub const ABANDONED_CLAIM_ERROR: &str = "abandoned after claim";

/// Result of one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboxCleanup {
    /// Stale claims marked `Failed`.
    pub abandoned: u64,
    /// Processed entries deleted.
    pub removed: u64,
}

/// Port for the notification outbox.
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Appends intents that are not tied to another write.
    async fn enqueue(&self, intents: &[NotificationIntent]) -> Result<(), DomainError>;

    /// Atomically claims up to `limit` pending entries, oldest first.
    async fn claim_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError>;

    async fn mark_sent(&self, id: Uuid) -> Result<(), DomainError>;

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;

    /// Retention sweep with a cutoff `older_than_hours` in the past.
    ///
    /// Deletes sent and failed entries processed before the cutoff, then marks
    /// entries still claimed since before the cutoff as failed with
    /// [`ABANDONED_CLAIM_ERROR`]. Those are never re-sent; they are deleted by
    /// a later sweep.
    async fn cleanup_old(&self, older_than_hours: u32) -> Result<OutboxCleanup, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EmailAddress, Timestamp};
    use crate::domain::notification::NotificationKind;

    fn entry() -> OutboxEntry {
        OutboxEntry::new(NotificationIntent::new(
            EmailAddress::try_new("a@b.io").unwrap(),
            "A",
            NotificationKind::VendorAccountCreated {
                company_name: "Acme".to_string(),
                contact_name: "A".to_string(),
                username: "a@b.io".to_string(),
            },
            Timestamp::now(),
        ))
    }

    #[test]
    fn new_entry_is_pending_and_keyed_by_intent() {
        let e = entry();
        assert_eq!(e.status, OutboxStatus::Pending);
        assert_eq!(e.id, e.intent.id);
    }

    #[test]
    fn mark_failed_records_error() {
        let mut e = entry();
        let now = Utc::now();
        e.mark_claimed(now);
        e.mark_failed("smtp refused", now);
        assert_eq!(e.status, OutboxStatus::Failed);
        assert_eq!(e.last_error.as_deref(), Some("smtp refused"));
        assert_eq!(e.processed_at, Some(now));
    }

    #[test]
    fn claim_is_abandoned_only_past_cutoff() {
        let mut e = entry();
        let claimed_at = Utc::now();
        e.mark_claimed(claimed_at);

        assert!(!e.is_abandoned_claim(claimed_at));
        assert!(e.is_abandoned_claim(claimed_at + chrono::Duration::seconds(1)));

        e.mark_sent(claimed_at);
        assert!(!e.is_abandoned_claim(claimed_at + chrono::Duration::hours(1)));
    }

    #[test]
    fn pending_entry_is_never_an_expired_record() {
        let e = entry();
        assert!(!e.is_expired_record(Utc::now() + chrono::Duration::days(365)));
    }
}
