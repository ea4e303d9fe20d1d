//! NotificationRelay - Background service draining the notification outbox.
//!
//! Second half of the outbox: transitions write intents alongside their
//! state change, and this relay renders and delivers them.
//!
//! ## Delivery Semantics
//!
//! At-most-once. Entries are claimed before the dispatcher is called and a
//! failed send is recorded, never retried. A crash between claim and send
//! loses that message instead of duplicating it; the retention sweep later
//! marks such claims failed so they do not linger.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 500ms | How often to claim pending intents |
//! | `batch_size` | 50 | Max intents claimed per poll |
//! | `max_concurrent_sends` | 8 | Sends in flight at once |
//! | `retention` | 168h | Age after which processed entries are deleted and unresolved claims failed |
//! | `cleanup_interval` | 1h | How often the retention sweep runs |

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::domain::foundation::DomainError;
use crate::domain::notification::{render, RenderContext};
use crate::ports::{NotificationDispatcher, NotificationOutbox, OutboxCleanup, OutboxEntry};

/// Configuration for the NotificationRelay service.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub poll_interval: Duration,
    pub batch_size: u32,
    pub max_concurrent_sends: usize,
    pub retention_hours: u32,
    pub cleanup_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
            max_concurrent_sends: 8,
            retention_hours: 168,
            cleanup_interval: Duration::from_secs(3600),
        }
    }
}

impl RelayConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_max_concurrent_sends(mut self, max: usize) -> Self {
        self.max_concurrent_sends = max;
        self
    }

    pub fn with_retention_hours(mut self, hours: u32) -> Self {
        self.retention_hours = hours;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

/// Counts for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub sent: usize,
    pub failed: usize,
}

impl RelayReport {
    pub fn total(&self) -> usize {
        self.sent + self.failed
    }
}

/// Renders and delivers outbox intents.
pub struct NotificationRelay {
    outbox: Arc<dyn NotificationOutbox>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    context: RenderContext,
    config: RelayConfig,
}

impl NotificationRelay {
    pub fn new(
        outbox: Arc<dyn NotificationOutbox>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        context: RenderContext,
    ) -> Self {
        Self::with_config(outbox, dispatcher, context, RelayConfig::default())
    }

    pub fn with_config(
        outbox: Arc<dyn NotificationOutbox>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        context: RenderContext,
        config: RelayConfig,
    ) -> Self {
        Self {
            outbox,
            dispatcher,
            context,
            config,
        }
    }

    /// Runs until the shutdown flag flips to `true`.
    ///
    /// Batch failures are logged and the loop keeps polling; a final batch
    /// is drained on shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut poll = time::interval(self.config.poll_interval);
        let mut cleanup = time::interval(self.config.cleanup_interval);
        info!(
            batch_size = self.config.batch_size,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            max_concurrent_sends = self.config.max_concurrent_sends,
            "Notification relay started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let report = self.process_batch().await?;
                        info!(sent = report.sent, failed = report.failed, "Notification relay stopped");
                        return Ok(());
                    }
                }

                _ = poll.tick() => {
                    if let Err(e) = self.process_batch().await {
                        error!(error = %e, "Notification batch failed");
                    }
                }

                _ = cleanup.tick() => {
                    if let Err(e) = self.sweep().await {
                        warn!(error = %e, "Outbox cleanup failed");
                    }
                }
            }
        }
    }

    /// Claims one batch and delivers it with bounded concurrency.
    pub async fn process_batch(&self) -> Result<RelayReport, DomainError> {
        let entries = self.outbox.claim_pending(self.config.batch_size).await?;
        if entries.is_empty() {
            return Ok(RelayReport::default());
        }

        let outcomes: Vec<Result<bool, DomainError>> = stream::iter(entries)
            .map(|entry| self.deliver(entry))
            .buffer_unordered(self.config.max_concurrent_sends.max(1))
            .collect()
            .await;

        let mut report = RelayReport::default();
        for outcome in outcomes {
            match outcome? {
                true => report.sent += 1,
                false => report.failed += 1,
            }
        }

        if report.total() > 0 {
            debug!(sent = report.sent, failed = report.failed, "Processed notification batch");
        }
        Ok(report)
    }

    /// Applies the retention window to the outbox.
    pub async fn sweep(&self) -> Result<OutboxCleanup, DomainError> {
        let swept = self.outbox.cleanup_old(self.config.retention_hours).await?;
        if swept != OutboxCleanup::default() {
            debug!(
                removed = swept.removed,
                abandoned = swept.abandoned,
                "Pruned outbox entries"
            );
        }
        Ok(swept)
    }

    /// Runs exactly one poll cycle.
    pub async fn poll_once(&self) -> Result<RelayReport, DomainError> {
        self.process_batch().await
    }

    async fn deliver(&self, entry: OutboxEntry) -> Result<bool, DomainError> {
        let email = render(&entry.intent, &self.context);
        let kind = entry.intent.kind.name();

        match self
            .dispatcher
            .send(&entry.intent.recipient, &email.subject, &email.html)
            .await
        {
            Ok(()) => {
                self.outbox.mark_sent(entry.id).await?;
                debug!(outbox_id = %entry.id, kind, "Notification sent");
                Ok(true)
            }
            Err(e) => {
                warn!(outbox_id = %entry.id, kind, error = %e, "Notification delivery failed; not retried");
                self.outbox.mark_failed(entry.id, &e.to_string()).await?;
                Ok(false)
            }
        }
    }
}
