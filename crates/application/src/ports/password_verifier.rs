//! Password verification port

#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Errors from password verification
#[derive(Debug, Error)]
pub enum PasswordVerifyError {
    /// The stored hash is not a valid PHC string
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
}

/// Port for checking a submitted password against a stored hash
///
/// Implementations must compare in constant time; the Argon2 adapter in the
/// infrastructure crate does.
#[cfg_attr(test, automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Verify `password` against a stored PHC-formatted hash
    fn verify(&self, password: &str, phc_hash: &str) -> Result<bool, PasswordVerifyError>;
}
