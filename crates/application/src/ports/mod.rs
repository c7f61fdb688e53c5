//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these
//! ports; the production relational adapter lives in the portal backend.

mod calendar_store;
mod contact_store;
mod password_verifier;
mod user_store;

use thiserror::Error;

#[cfg(test)]
pub use calendar_store::MockCalendarStore;
pub use calendar_store::CalendarStore;
#[cfg(test)]
pub use contact_store::MockContactStore;
pub use contact_store::ContactStore;
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordVerifier, PasswordVerifyError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::UserStore;

/// Errors surfaced by store ports
///
/// The store owns its own retry and pooling behavior; by the time an error
/// reaches this boundary it is terminal for the current request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A query or mutation failed
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
}
