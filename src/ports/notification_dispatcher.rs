//! Notification dispatcher port - Formats nothing, just delivers.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress};

/// Delivers one rendered email.
///
/// Retry policy, if any, belongs to the implementation. Callers treat
/// failures as final.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(
        &self,
        address: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError>;
}
