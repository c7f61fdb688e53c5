//! Application services - Use case implementations

mod auth_service;

pub use auth_service::{AuthError, AuthService};
