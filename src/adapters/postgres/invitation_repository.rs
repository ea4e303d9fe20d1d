//! PostgreSQL implementation of InvitationRepository.
//!
//! Employee and vendor invitations share one table; `kind` selects which
//! optional columns apply. Both write paths run in a transaction together
//! with their outbox rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::notification_outbox::insert_intents;
use crate::domain::foundation::{
    AccountId, DomainError, EmailAddress, ErrorCode, Role, Timestamp,
};
use crate::domain::invitation::{
    EmployeeInvitation, Invitation, InvitationCode, InvitationGate, InvitationLifecycle,
    InvitationState, VendorInvitation,
};
use crate::domain::notification::NotificationIntent;
use crate::ports::{ConsumeOutcome, InsertOutcome, InvitationRepository};

const INVITATION_COLUMNS: &str = "code, kind, email, role, vendor_name, phone, issued_by, \
     status, consumed_by, consumed_at, created_at, expires_at";

/// PostgreSQL implementation of the InvitationRepository port.
#[derive(Clone)]
pub struct PostgresInvitationRepository {
    pool: PgPool,
}

impl PostgresInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an invitation.
#[derive(Debug, sqlx::FromRow)]
struct InvitationRow {
    code: String,
    kind: String,
    email: String,
    role: String,
    vendor_name: Option<String>,
    phone: Option<String>,
    issued_by: Uuid,
    status: String,
    consumed_by: Option<Uuid>,
    consumed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = DomainError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        let lifecycle = InvitationLifecycle {
            code: InvitationCode::try_new(&row.code).map_err(corrupt)?,
            email: EmailAddress::try_new(&row.email).map_err(corrupt)?,
            issued_by: AccountId::from_uuid(row.issued_by),
            created_at: Timestamp::from_datetime(row.created_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
            state: InvitationState::parse_stored(&row.status).map_err(corrupt)?,
            consumed_by: row.consumed_by.map(AccountId::from_uuid),
            consumed_at: row.consumed_at.map(Timestamp::from_datetime),
        };

        match row.kind.as_str() {
            "employee" => Ok(Invitation::Employee(EmployeeInvitation {
                lifecycle,
                role: row.role.parse::<Role>().map_err(corrupt)?,
            })),
            "vendor" => Ok(Invitation::Vendor(VendorInvitation {
                lifecycle,
                vendor_name: row.vendor_name.unwrap_or_default(),
                phone: row.phone,
            })),
            other => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid invitation kind value: {}", other),
            )),
        }
    }
}

fn corrupt(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid invitation row: {}", err),
    )
}

fn vendor_columns(invitation: &Invitation) -> (Option<&str>, Option<&str>) {
    match invitation {
        Invitation::Employee(_) => (None, None),
        Invitation::Vendor(v) => (Some(v.vendor_name.as_str()), v.phone.as_deref()),
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn insert(
        &self,
        invitation: &Invitation,
        intents: &[NotificationIntent],
    ) -> Result<InsertOutcome, DomainError> {
        let lifecycle = invitation.lifecycle();
        let email_key = lifecycle.email.normalized();
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        // 1. Serialize issuers targeting the same address
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&email_key)
            .execute(&mut *tx)
            .await
            .map_err(DomainError::database)?;

        // 2. Re-check for an active invitation under the lock
        let active: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT code FROM invitations
            WHERE email_normalized = $1
              AND status = 'pending'
              AND expires_at >= $2
            LIMIT 1
            "#,
        )
        .bind(&email_key)
        .bind(lifecycle.created_at.as_datetime())
        .fetch_optional(&mut *tx)
        .await
        .map_err(DomainError::database)?;

        if active.is_some() {
            return Ok(InsertOutcome::ActiveInvitationExists);
        }

        // 3. Insert; a taken code leaves the row untouched
        let (vendor_name, phone) = vendor_columns(invitation);
        let result = sqlx::query(
            r#"
            INSERT INTO invitations (
                code, kind, email, email_normalized, role, vendor_name, phone,
                issued_by, status, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9, $10)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(lifecycle.code.as_str())
        .bind(invitation.kind().as_str())
        .bind(lifecycle.email.as_str())
        .bind(&email_key)
        .bind(invitation.role().as_str())
        .bind(vendor_name)
        .bind(phone)
        .bind(lifecycle.issued_by.as_uuid())
        .bind(lifecycle.created_at.as_datetime())
        .bind(lifecycle.expires_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert invitation: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(InsertOutcome::CodeCollision);
        }

        // 4. Outbox rows commit with the invitation
        insert_intents(&mut *tx, intents).await?;
        tx.commit().await.map_err(DomainError::database)?;

        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Invitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invitations WHERE code = $1",
            INVITATION_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_active_for_email(
        &self,
        email: &EmailAddress,
        now: Timestamp,
    ) -> Result<Option<Invitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM invitations
            WHERE email_normalized = $1
              AND status = 'pending'
              AND expires_at >= $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            INVITATION_COLUMNS
        ))
        .bind(email.normalized())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(Invitation::try_from).transpose()
    }

    async fn has_consumed_for_email(&self, email: &EmailAddress) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM invitations
                WHERE email_normalized = $1 AND status = 'consumed'
            )
            "#,
        )
        .bind(email.normalized())
        .fetch_one(&self.pool)
        .await
        .map_err(DomainError::database)?;

        Ok(exists)
    }

    async fn consume_if_pending(
        &self,
        code: &InvitationCode,
        account_id: AccountId,
        now: Timestamp,
        intents: &[NotificationIntent],
    ) -> Result<ConsumeOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        let consumed: Option<InvitationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE invitations
            SET status = 'consumed', consumed_by = $2, consumed_at = $3
            WHERE code = $1 AND status = 'pending' AND expires_at >= $3
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(code.as_str())
        .bind(account_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to consume invitation: {}", e)))?;

        if let Some(row) = consumed {
            let invitation = Invitation::try_from(row)?;
            insert_intents(&mut *tx, intents).await?;
            tx.commit().await.map_err(DomainError::database)?;
            return Ok(ConsumeOutcome::Consumed(invitation));
        }
        drop(tx);

        // Lost the conditional update; report why
        let current: Option<(String, DateTime<Utc>)> =
            sqlx::query_as("SELECT status, expires_at FROM invitations WHERE code = $1")
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(DomainError::database)?;

        Ok(match current {
            None => ConsumeOutcome::NotFound,
            Some((_, expires_at)) if expires_at < *now.as_datetime() => ConsumeOutcome::Expired,
            Some(_) => ConsumeOutcome::AlreadyConsumed,
        })
    }
}
