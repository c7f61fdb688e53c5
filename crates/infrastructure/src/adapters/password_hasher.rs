//! Password hashing utilities using Argon2
//!
//! Provides hashing and verification of account passwords using Argon2id.
//! Hashes use the PHC string format, which is self-describing and portable,
//! so the DAV server verifies whatever the portal's account management wrote.
//!
//! # Examples
//!
//! ```
//! use infrastructure::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("correct horse battery").unwrap();
//! assert!(hasher.verify_hash("correct horse battery", &hash).unwrap());
//! assert!(!hasher.verify_hash("wrong", &hash).unwrap());
//! ```

use application::{PasswordVerifier, PasswordVerifyError};
use argon2::{
    Argon2, PasswordHash, PasswordHasher as ArgonPasswordHasher, PasswordVerifier as _,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while hashing a password
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Failed to hash the password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Argon2id password hasher and verifier
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a hasher with the default Argon2id parameters
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password into a PHC-formatted string
    ///
    /// Used by the seeding CLI path and by tests; the portal backend normally
    /// owns hash creation.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash
    pub fn verify_hash(&self, password: &str, hash: &str) -> Result<bool, PasswordVerifyError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordVerifyError::InvalidHashFormat(e.to_string()))?;

        let argon2 = Argon2::default();
        let result = argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if !result {
            debug!("password verification failed");
        }

        Ok(result)
    }
}

impl PasswordVerifier for PasswordHasher {
    fn verify(&self, password: &str, phc_hash: &str) -> Result<bool, PasswordVerifyError> {
        self.verify_hash(password, phc_hash)
    }
}
