//! Resend dispatcher - Delivers email through the Resend HTTP API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::new(api_key, "Portal <noreply@example.com>")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let dispatcher = ResendDispatcher::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode};
use crate::ports::NotificationDispatcher;

/// Configuration for the Resend dispatcher.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// `From` header, e.g. `Portal <noreply@example.com>`.
    pub from: String,
    /// Base URL for the API (default: https://api.resend.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: Secret<String>, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends email via Resend.
pub struct ResendDispatcher {
    config: ResendConfig,
    client: Client,
}

impl ResendDispatcher {
    pub fn new(config: ResendConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;
        Ok(Self { config, client })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NotificationDispatcher for ResendDispatcher {
    async fn send(
        &self,
        address: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError> {
        let request = SendEmailRequest {
            from: &self.config.from,
            to: [address.as_str()],
            subject,
            html: html_body,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Email request failed: {}", e),
                )
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DomainError::new(
            ErrorCode::NotificationError,
            format!("Email API returned {}: {}", status, body),
        )
        .with_detail("status", status.as_u16().to_string()))
    }
}
