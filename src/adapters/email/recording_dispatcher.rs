//! Recording dispatcher - Keeps sent email in memory.
//!
//! For tests and dry runs. Individual recipients, or every send, can be made
//! to fail.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode};
use crate::ports::NotificationDispatcher;

/// An email captured by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: EmailAddress,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<SentEmail>>,
    failing_recipients: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails.
    pub fn failing() -> Self {
        let dispatcher = Self::default();
        *dispatcher.fail_all.lock().unwrap_or_else(PoisonError::into_inner) = true;
        dispatcher
    }

    /// Sends to `address` fail.
    pub fn fail_for(&self, address: &EmailAddress) {
        self.failing_recipients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.normalized());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn sent_to(&self, address: &EmailAddress) -> Vec<SentEmail> {
        self.sent()
            .into_iter()
            .filter(|e| e.to.matches(address))
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(
        &self,
        address: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError> {
        let fail_all = *self.fail_all.lock().unwrap_or_else(PoisonError::into_inner);
        let fail_this = self
            .failing_recipients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&address.normalized());
        if fail_all || fail_this {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                "Simulated delivery failure",
            ));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentEmail {
                to: address.clone(),
                subject: subject.to_string(),
                html: html_body.to_string(),
            });
        Ok(())
    }
}
