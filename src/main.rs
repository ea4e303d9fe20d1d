//! portal-onboarding - Notification relay process.
//!
//! Loads configuration, connects to PostgreSQL, applies migrations and
//! delivers queued notification intents until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing::{error, info};

use portal_onboarding::adapters::postgres::PostgresNotificationOutbox;
use portal_onboarding::adapters::{NotificationRelay, ResendConfig, ResendDispatcher};
use portal_onboarding::config::AppConfig;
use portal_onboarding::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.telemetry)?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let outbox = Arc::new(PostgresNotificationOutbox::new(pool.clone()));
    let dispatcher = Arc::new(ResendDispatcher::new(ResendConfig::new(
        config.email.resend_api_key.clone(),
        config.email.from_header(),
    ))?);
    let relay = NotificationRelay::with_config(
        outbox,
        dispatcher,
        config.render_context(),
        config.relay.to_settings(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
        info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    relay.run(shutdown_rx).await?;

    pool.close().await;
    Ok(())
}
