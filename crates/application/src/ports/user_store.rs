//! User store port

use async_trait::async_trait;
use domain::User;
#[cfg(test)]
use mockall::automock;

use super::StoreError;

/// Port for user account lookup
///
/// The DAV subsystem only reads accounts; issuance and lifecycle live in the
/// portal backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by login name
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
