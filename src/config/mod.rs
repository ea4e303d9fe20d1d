//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `PORTAL_ONBOARDING`
//! prefix and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use portal_onboarding::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod invitations;
mod relay;
mod telemetry;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use invitations::InvitationConfig;
pub use relay::RelayConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::domain::notification::RenderContext;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,

    /// Invitation lifetimes and code generation
    #[serde(default)]
    pub invitations: InvitationConfig,

    /// Notification relay tuning
    #[serde(default)]
    pub relay: RelayConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PORTAL_ONBOARDING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `PORTAL_ONBOARDING__DATABASE__URL=...` -> `database.url = ...`
    /// - `PORTAL_ONBOARDING__INVITATIONS__VENDOR_TTL_DAYS=45` -> `invitations.vendor_ttl_days = 45`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PORTAL_ONBOARDING")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.email.validate()?;
        self.invitations.validate()?;
        self.relay.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Values the notification renderer needs
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            company_name: self.email.company_name.clone(),
            portal_url: self.email.portal_base().to_string(),
        }
    }
}
