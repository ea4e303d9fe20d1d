//! Password hashing port.

use secrecy::Secret;

use crate::domain::account::HashedPassword;
use crate::domain::foundation::DomainError;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Secret<String>) -> Result<HashedPassword, DomainError>;

    fn verify(&self, password: &Secret<String>, hash: &HashedPassword) -> Result<bool, DomainError>;
}
