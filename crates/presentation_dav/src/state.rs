//! Application state shared across handlers

use std::sync::Arc;

use application::{AuthService, CalendarStore, ContactStore};
use infrastructure::DavConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Basic-auth gate
    pub auth: AuthService,
    /// Calendar/event persistence
    pub calendars: Arc<dyn CalendarStore>,
    /// Address book/contact persistence
    pub contacts: Arc<dyn ContactStore>,
    /// Mount path and realm
    pub dav: Arc<DavConfig>,
}

impl AppState {
    /// The mount prefix hrefs are built under
    #[must_use]
    pub fn mount(&self) -> &str {
        &self.dav.mount_path
    }
}
