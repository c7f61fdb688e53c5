//! Application layer - Use cases and orchestration
//!
//! Defines the ports the DAV subsystem needs from the outside world (the
//! relational store and password verification) and the authentication
//! service that sits between the HTTP dispatcher and those ports.

pub mod ports;
pub mod services;

pub use ports::*;
pub use services::*;
