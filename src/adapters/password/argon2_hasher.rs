//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use secrecy::{ExposeSecret, Secret};

use crate::domain::account::HashedPassword;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

/// Hashes with Argon2id and default parameters, salted per password.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Secret<String>) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Password hashing failed: {}", e))
            })?;
        Ok(HashedPassword::new(hash.to_string()))
    }

    fn verify(&self, password: &Secret<String>, hash: &HashedPassword) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash.as_str()).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Stored hash is invalid: {}", e))
        })?;
        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }
}
