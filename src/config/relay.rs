//! Notification relay configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::RelayConfig as RelaySettings;

/// Outbox relay tuning
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Intents claimed per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Sends in flight at once
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,

    /// Hours processed entries are kept before cleanup
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    /// Seconds between cleanup sweeps
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl RelayConfig {
    /// Settings for the relay adapter
    pub fn to_settings(&self) -> RelaySettings {
        RelaySettings::default()
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_batch_size(self.batch_size)
            .with_max_concurrent_sends(self.max_concurrent_sends)
            .with_retention_hours(self.retention_hours)
            .with_cleanup_interval(Duration::from_secs(self.cleanup_interval_secs))
    }

    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 || self.cleanup_interval_secs == 0 {
            return Err(ValidationError::InvalidRelayInterval);
        }
        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ValidationError::InvalidBatchSize);
        }
        if self.max_concurrent_sends == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
            max_concurrent_sends: default_max_concurrent_sends(),
            retention_hours: default_retention_hours(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_batch_size() -> u32 {
    50
}

fn default_max_concurrent_sends() -> usize {
    8
}

fn default_retention_hours() -> u32 {
    168
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}
