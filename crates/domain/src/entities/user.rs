//! Portal user account
//!
//! Only the fields the DAV subsystem consults. Account management (signup,
//! password reset, OAuth linkage) lives in the portal backend.

use serde::{Deserialize, Serialize};

/// A portal user, looked up during Basic authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login name; also the username segment in DAV paths
    pub username: String,
    /// Argon2 PHC hash; `None` for externally-authenticated accounts,
    /// which cannot use Basic auth
    pub password_hash: Option<String>,
    /// Disabled accounts are rejected even with a valid password
    pub is_active: bool,
}

impl User {
    /// Create an active user with a password hash
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password_hash: Some(password_hash.into()),
            is_active: true,
        }
    }

    /// Mark the account inactive
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}
