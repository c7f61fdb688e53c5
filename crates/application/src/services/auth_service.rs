//! HTTP Basic authentication for DAV clients
//!
//! Calendar and contacts clients cannot run the portal's browser login flow,
//! so the DAV surface authenticates every request from the `Authorization`
//! header against the stored password hash. Verification goes through the
//! `PasswordVerifier` port, which provides constant-time comparison.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::User;
use thiserror::Error;
use tracing::debug;

use crate::ports::{PasswordVerifier, StoreError, UserStore};

/// Authentication failures
///
/// All variants map to 401 at the HTTP layer; the split exists so logs can
/// tell a missing header from a wrong password without leaking either to the
/// client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header, or a scheme other than `Basic`
    #[error("Missing or unsupported Authorization header")]
    MissingCredentials,

    /// Undecodable header, unknown user, inactive account, or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The user lookup itself failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates Basic credentials against the user store
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create an auth service over the given ports
    pub fn new(users: Arc<dyn UserStore>, passwords: Arc<dyn PasswordVerifier>) -> Self {
        Self { users, passwords }
    }

    /// Authenticate an `Authorization` header value
    ///
    /// Accepts only the `Basic` scheme. The decoded value is split on the
    /// first `:`, so passwords may contain colons.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or(AuthError::MissingCredentials)?;

        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|_| AuthError::InvalidCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;

        let Some(user) = self.users.user_by_username(username).await? else {
            debug!(username, "DAV auth rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };
        if !user.is_active {
            debug!(username, "DAV auth rejected: inactive account");
            return Err(AuthError::InvalidCredentials);
        }
        let Some(hash) = user.password_hash.as_deref() else {
            debug!(username, "DAV auth rejected: no password hash");
            return Err(AuthError::InvalidCredentials);
        };

        match self.passwords.verify(password, hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                debug!(username, "DAV auth rejected: password mismatch");
                Err(AuthError::InvalidCredentials)
            },
            Err(e) => {
                debug!(username, error = %e, "DAV auth rejected: unverifiable hash");
                Err(AuthError::InvalidCredentials)
            },
        }
    }
}
