//! Calendar collection entity

use serde::{Deserialize, Serialize};

/// A calendar collection owned by a single user
///
/// Calendars are provisioned by the portal (a default calendar on first
/// access); the DAV subsystem only reads them and writes events into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Unique calendar identifier; the collection segment in DAV paths
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Optional CSS color, surfaced via the Apple `calendar-color` property
    pub color: Option<String>,
    /// Ordering hint used by the portal UI
    pub sort_order: i32,
    /// Hidden calendars are still synced over DAV
    pub is_visible: bool,
}

impl Calendar {
    /// Create a visible calendar with default ordering
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            color: None,
            sort_order: 0,
            is_visible: true,
        }
    }

    /// Set the display color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
