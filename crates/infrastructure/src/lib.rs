//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer. This repo ships the
//! Argon2 password adapter, configuration loading, and an in-memory store used
//! by the binary bootstrap and the integration tests; the relational adapter
//! backed by the portal database lives in the portal backend.

pub mod adapters;
pub mod config;
pub mod persistence;

pub use adapters::{PasswordHashError, PasswordHasher};
pub use config::{AppConfig, DavConfig, ServerConfig};
pub use persistence::MemoryStore;
