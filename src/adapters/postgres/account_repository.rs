//! PostgreSQL implementation of AccountRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::{Account, HashedPassword};
use crate::domain::foundation::{AccountId, DomainError, EmailAddress, ErrorCode, Role, Timestamp};
use crate::domain::invitation::InvitationCode;
use crate::ports::AccountRepository;

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, role, first_name, last_name, \
     is_active, onboarding_completed, invitation_code, created_at";

/// PostgreSQL implementation of the AccountRepository port.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    onboarding_completed: bool,
    invitation_code: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, e: &dyn std::fmt::Display| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", field, e))
        };

        Ok(Account {
            id: AccountId::from_uuid(row.id),
            username: row.username,
            email: EmailAddress::try_new(&row.email).map_err(|e| invalid("email", &e))?,
            password_hash: HashedPassword::new(row.password_hash),
            role: row.role.parse::<Role>().map_err(|e| invalid("role", &e))?,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            onboarding_completed: row.onboarding_completed,
            invitation_code: InvitationCode::try_new(&row.invitation_code)
                .map_err(|e| invalid("invitation_code", &e))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, username, email, email_normalized, password_hash, role,
                first_name, last_name, is_active, onboarding_completed,
                invitation_code, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.username)
        .bind(account.email.as_str())
        .bind(account.email.normalized())
        .bind(account.password_hash.as_str())
        .bind(account.role.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.is_active)
        .bind(account.onboarding_completed)
        .bind(account.invitation_code.as_str())
        .bind(account.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if matches!(
                    db_err.constraint(),
                    Some("accounts_email_key") | Some("accounts_username_key")
                ) {
                    return DomainError::new(
                        ErrorCode::UserAlreadyExists,
                        "An account with this email or username already exists",
                    )
                    .with_detail("email", account.email.normalized());
                }
            }
            DomainError::database(format!("Failed to insert account: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE email_normalized = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email.normalized())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(Account::try_from).transpose()
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete account: {}", e)))?;

        Ok(())
    }
}
