//! Calendar store port
//!
//! Async CRUD boundary for calendars and events. Each method is one scoped
//! store round-trip; an upsert or delete is a single commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Calendar, CalendarEvent, EventDraft};
#[cfg(test)]
use mockall::automock;

use super::StoreError;

/// Port for calendar and event persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// List the calendars owned by a user, in the portal's display order
    async fn calendars_for_user(&self, user_id: &str) -> Result<Vec<Calendar>, StoreError>;

    /// Fetch a calendar by id
    async fn calendar(&self, calendar_id: &str) -> Result<Option<Calendar>, StoreError>;

    /// List the events of a calendar, ordered by start
    async fn events_for_calendar(
        &self,
        calendar_id: &str,
    ) -> Result<Vec<CalendarEvent>, StoreError>;

    /// Fetch an event by id
    async fn event(&self, event_id: &str) -> Result<Option<CalendarEvent>, StoreError>;

    /// Fetch the events whose ids appear in `ids`; missing ids are skipped
    async fn events_by_ids(&self, ids: &[String]) -> Result<Vec<CalendarEvent>, StoreError>;

    /// Insert or update an event under the client-supplied id
    ///
    /// Existing rows keep fields the draft leaves out; new rows are created
    /// under `calendar_id`. Returns the stored row with fresh timestamps.
    async fn upsert_event(
        &self,
        event_id: &str,
        calendar_id: &str,
        draft: EventDraft,
    ) -> Result<CalendarEvent, StoreError>;

    /// Delete an event; returns `false` when no row existed
    async fn delete_event(&self, event_id: &str) -> Result<bool, StoreError>;

    /// Newest `updated_at` among a calendar's events, for the ctag
    async fn latest_event_update(
        &self,
        calendar_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CalendarStore>();
    }
}
