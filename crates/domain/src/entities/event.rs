//! Calendar event entity and write draft

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Event status, mirroring the iCalendar STATUS property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The event will take place
    #[default]
    Confirmed,
    /// The event is not yet certain
    Tentative,
    /// The event was cancelled but not deleted
    Cancelled,
}

impl EventStatus {
    /// Lowercase form used by the portal API and the store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Tentative => "tentative",
            Self::Cancelled => "cancelled",
        }
    }

    /// Uppercase form used on the iCalendar wire
    #[must_use]
    pub const fn as_ical(self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Tentative => "TENTATIVE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse either casing
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "tentative" => Ok(Self::Tentative),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::InvalidEventStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar event
///
/// The id is chosen by the client (DAV clients mint their own resource names
/// on PUT), never generated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Client-supplied resource identifier
    pub id: String,
    /// Owning calendar id
    pub calendar_id: String,
    /// Event title (SUMMARY)
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Free-text location
    pub location: Option<String>,
    /// Start instant; for all-day events, midnight UTC of the start date
    pub start: DateTime<Utc>,
    /// End instant; invariant `end >= start` is assumed, not enforced here
    pub end: DateTime<Utc>,
    /// All-day events serialize DTSTART/DTEND as dates
    pub all_day: bool,
    /// Event status
    pub status: EventStatus,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Row update time; drives the ETag
    pub updated_at: DateTime<Utc>,
}

/// Fields decoded from an incoming iCalendar document
///
/// Optional fields are applied to an existing row only when present, so a
/// client that omits DESCRIPTION does not wipe a stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// SUMMARY; empty string when absent
    pub title: String,
    /// DESCRIPTION when present
    pub description: Option<String>,
    /// LOCATION when present
    pub location: Option<String>,
    /// DTSTART, normalized to UTC
    pub start: Option<DateTime<Utc>>,
    /// DTEND, normalized to UTC
    pub end: Option<DateTime<Utc>>,
    /// Whether DTSTART was a bare date
    pub all_day: Option<bool>,
    /// STATUS when present
    pub status: Option<EventStatus>,
}
