//! Account repository port.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, EmailAddress};

/// Repository port for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::UserAlreadyExists` (with an `email` detail) when
    /// the email or username is taken.
    async fn insert(&self, account: &Account) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError>;

    /// Removes an account. Used only to compensate a failed onboarding.
    async fn delete(&self, id: &AccountId) -> Result<(), DomainError>;
}
