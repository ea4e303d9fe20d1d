//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Portal URL must start with http:// or https://")]
    InvalidPortalUrl,

    #[error("Invitation lifetimes must be positive")]
    InvalidInvitationTtl,

    #[error("Invitation code length out of range")]
    InvalidCodeLength,

    #[error("Invitation code attempts must be at least 1")]
    InvalidCodeAttempts,

    #[error("Relay intervals must be positive")]
    InvalidRelayInterval,

    #[error("Relay batch size must be between 1 and 1000")]
    InvalidBatchSize,

    #[error("Relay concurrency must be at least 1")]
    InvalidConcurrency,
}
