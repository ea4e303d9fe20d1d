//! PostgreSQL implementation of NotificationOutbox.
//!
//! Intents are stored as serialized JSON next to a denormalized `kind` and
//! `recipient` for querying. Claiming uses `FOR UPDATE SKIP LOCKED` so
//! concurrent relays never hand out the same row. The claim is stamped with
//! `claimed_at`; the retention sweep fails claims left unresolved past the
//! cutoff.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::NotificationIntent;
use crate::ports::{
    NotificationOutbox, OutboxCleanup, OutboxEntry, OutboxStatus, ABANDONED_CLAIM_ERROR,
};

/// PostgreSQL-backed notification outbox.
#[derive(Clone)]
pub struct PostgresNotificationOutbox {
    pool: PgPool,
}

impl PostgresNotificationOutbox {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OutboxRow {
    id: Uuid,
    payload: String,
    status: String,
    created_at: DateTime<Utc>,
    claimed_at: Option<DateTime<Utc>>,
    processed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl TryFrom<OutboxRow> for OutboxEntry {
    type Error = DomainError;

    fn try_from(row: OutboxRow) -> Result<Self, Self::Error> {
        let intent: NotificationIntent = serde_json::from_str(&row.payload).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid outbox payload: {}", e),
            )
            .with_detail("outbox_id", row.id.to_string())
        })?;

        Ok(OutboxEntry {
            id: row.id,
            intent,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
            claimed_at: row.claimed_at,
            processed_at: row.processed_at,
            last_error: row.last_error,
        })
    }
}

fn parse_status(s: &str) -> Result<OutboxStatus, DomainError> {
    match s {
        "pending" => Ok(OutboxStatus::Pending),
        "claimed" => Ok(OutboxStatus::Claimed),
        "sent" => Ok(OutboxStatus::Sent),
        "failed" => Ok(OutboxStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid outbox status value: {}", s),
        )),
    }
}

/// Writes intents using an existing connection or transaction.
///
/// Repositories call this inside the transaction that records the state
/// change, so the intents commit or roll back with it.
pub(super) async fn insert_intents(
    conn: &mut PgConnection,
    intents: &[NotificationIntent],
) -> Result<(), DomainError> {
    for intent in intents {
        let payload = serde_json::to_string(intent).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize notification intent: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO notification_outbox (id, kind, recipient, payload, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            "#,
        )
        .bind(intent.id)
        .bind(intent.kind.name())
        .bind(intent.recipient.normalized())
        .bind(payload)
        .bind(intent.created_at.as_datetime())
        .execute(&mut *conn)
        .await
        .map_err(|e| DomainError::database(format!("Failed to enqueue notification: {}", e)))?;
    }
    Ok(())
}

#[async_trait]
impl NotificationOutbox for PostgresNotificationOutbox {
    async fn enqueue(&self, intents: &[NotificationIntent]) -> Result<(), DomainError> {
        if intents.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;
        insert_intents(&mut *tx, intents).await?;
        tx.commit().await.map_err(DomainError::database)?;
        Ok(())
    }

    async fn claim_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        let rows: Vec<OutboxRow> = sqlx::query_as(
            r#"
            UPDATE notification_outbox
            SET status = 'claimed', claimed_at = NOW()
            WHERE id IN (
                SELECT id FROM notification_outbox
                WHERE status = 'pending'
                ORDER BY created_at ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, payload, status, created_at, claimed_at, processed_at, last_error
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to claim notifications: {}", e)))?;

        let mut entries = rows
            .into_iter()
            .map(OutboxEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn mark_sent(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'sent', processed_at = NOW(), last_error = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DomainError::database)?;

        if result.rows_affected() == 0 {
            return Err(entry_not_found(id));
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'failed', processed_at = NOW(), last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(DomainError::database)?;

        if result.rows_affected() == 0 {
            return Err(entry_not_found(id));
        }
        Ok(())
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<OutboxCleanup, DomainError> {
        let hours = i32::try_from(older_than_hours).unwrap_or(i32::MAX);
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        let removed = sqlx::query(
            r#"
            DELETE FROM notification_outbox
            WHERE status IN ('sent', 'failed')
              AND processed_at < NOW() - make_interval(hours => $1)
            "#,
        )
        .bind(hours)
        .execute(&mut *tx)
        .await
        .map_err(DomainError::database)?
        .rows_affected();

        let abandoned = sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'failed', processed_at = NOW(), last_error = $2
            WHERE status = 'claimed'
              AND COALESCE(claimed_at, created_at) < NOW() - make_interval(hours => $1)
            "#,
        )
        .bind(hours)
        .bind(ABANDONED_CLAIM_ERROR)
        .execute(&mut *tx)
        .await
        .map_err(DomainError::database)?
        .rows_affected();

        tx.commit().await.map_err(DomainError::database)?;

        if abandoned > 0 {
            warn!(abandoned, "Finalized abandoned outbox claims");
        }
        Ok(OutboxCleanup { abandoned, removed })
    }
}

fn entry_not_found(id: Uuid) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "Outbox entry not found")
        .with_detail("outbox_id", id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_every_stored_value() {
        for status in [
            OutboxStatus::Pending,
            OutboxStatus::Claimed,
            OutboxStatus::Sent,
            OutboxStatus::Failed,
        ] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn parse_status_rejects_unknown_value() {
        let err = parse_status("retrying").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn corrupt_payload_is_a_database_error() {
        let row = OutboxRow {
            id: Uuid::new_v4(),
            payload: "{not json".to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
            claimed_at: None,
            processed_at: None,
            last_error: None,
        };

        let err = OutboxEntry::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.details.contains_key("outbox_id"));
    }
}
