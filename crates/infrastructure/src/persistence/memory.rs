//! In-memory store
//!
//! Implements every store port over process-local maps. Backs the server
//! binary when no portal database is wired up, and the integration tests.
//! Mutations stamp `updated_at` with the wall clock, so ETags and ctags
//! behave exactly as they do against the relational adapter.

use std::collections::HashMap;
use std::sync::Arc;

use application::{CalendarStore, ContactStore, StoreError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AddressBook, Calendar, CalendarEvent, Contact, ContactDraft, EventDraft, User};
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    calendars: HashMap<String, Calendar>,
    events: HashMap<String, CalendarEvent>,
    address_books: HashMap<String, AddressBook>,
    contacts: HashMap<String, Contact>,
}

/// Process-local implementation of the store ports
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user row
    pub fn add_user(&self, user: User) {
        self.inner.write().users.insert(user.username.clone(), user);
    }

    /// Insert a calendar row
    pub fn add_calendar(&self, calendar: Calendar) {
        self.inner
            .write()
            .calendars
            .insert(calendar.id.clone(), calendar);
    }

    /// Insert an address book row
    pub fn add_address_book(&self, book: AddressBook) {
        self.inner
            .write()
            .address_books
            .insert(book.id.clone(), book);
    }

    /// Insert an event row as-is, timestamps included
    pub fn add_event(&self, event: CalendarEvent) {
        self.inner.write().events.insert(event.id.clone(), event);
    }

    /// Insert a contact row as-is, timestamps included
    pub fn add_contact(&self, contact: Contact) {
        self.inner
            .write()
            .contacts
            .insert(contact.id.clone(), contact);
    }

    /// Create a user together with the default collections the portal
    /// provisions on first access
    ///
    /// Returns the created rows so callers can address them by id.
    pub fn provision_account(
        &self,
        username: &str,
        password_hash: &str,
    ) -> (User, Calendar, AddressBook) {
        let user = User::new(Uuid::new_v4().to_string(), username, password_hash);
        let calendar = Calendar::new(Uuid::new_v4().to_string(), &user.id, "Personal");
        let book = AddressBook::new(Uuid::new_v4().to_string(), &user.id, "Contacts");

        self.add_user(user.clone());
        self.add_calendar(calendar.clone());
        self.add_address_book(book.clone());
        (user, calendar, book)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().users.get(username).cloned())
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn calendars_for_user(&self, user_id: &str) -> Result<Vec<Calendar>, StoreError> {
        let tables = self.inner.read();
        let mut calendars: Vec<Calendar> = tables
            .calendars
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        calendars.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(calendars)
    }

    async fn calendar(&self, calendar_id: &str) -> Result<Option<Calendar>, StoreError> {
        Ok(self.inner.read().calendars.get(calendar_id).cloned())
    }

    async fn events_for_calendar(
        &self,
        calendar_id: &str,
    ) -> Result<Vec<CalendarEvent>, StoreError> {
        let tables = self.inner.read();
        let mut events: Vec<CalendarEvent> = tables
            .events
            .values()
            .filter(|e| e.calendar_id == calendar_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn event(&self, event_id: &str) -> Result<Option<CalendarEvent>, StoreError> {
        Ok(self.inner.read().events.get(event_id).cloned())
    }

    async fn events_by_ids(&self, ids: &[String]) -> Result<Vec<CalendarEvent>, StoreError> {
        let tables = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.events.get(id).cloned())
            .collect())
    }

    async fn upsert_event(
        &self,
        event_id: &str,
        calendar_id: &str,
        draft: EventDraft,
    ) -> Result<CalendarEvent, StoreError> {
        let now = Utc::now();
        let mut tables = self.inner.write();

        let event = match tables.events.get_mut(event_id) {
            Some(existing) => {
                existing.title = draft.title;
                if let Some(description) = draft.description {
                    existing.description = Some(description);
                }
                if let Some(location) = draft.location {
                    existing.location = Some(location);
                }
                if let Some(start) = draft.start {
                    existing.start = start;
                }
                if let Some(end) = draft.end {
                    existing.end = end;
                }
                if let Some(all_day) = draft.all_day {
                    existing.all_day = all_day;
                }
                if let Some(status) = draft.status {
                    existing.status = status;
                }
                existing.updated_at = now;
                existing.clone()
            },
            None => {
                let event = CalendarEvent {
                    id: event_id.to_string(),
                    calendar_id: calendar_id.to_string(),
                    title: draft.title,
                    description: draft.description,
                    location: draft.location,
                    start: draft.start.unwrap_or(now),
                    end: draft.end.unwrap_or(now),
                    all_day: draft.all_day.unwrap_or(false),
                    status: draft.status.unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                };
                tables.events.insert(event.id.clone(), event.clone());
                event
            },
        };
        Ok(event)
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool, StoreError> {
        Ok(self.inner.write().events.remove(event_id).is_some())
    }

    async fn latest_event_update(
        &self,
        calendar_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let tables = self.inner.read();
        Ok(tables
            .events
            .values()
            .filter(|e| e.calendar_id == calendar_id)
            .map(|e| e.updated_at)
            .max())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn address_books_for_user(&self, user_id: &str) -> Result<Vec<AddressBook>, StoreError> {
        let tables = self.inner.read();
        let mut books: Vec<AddressBook> = tables
            .address_books
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(books)
    }

    async fn address_book(&self, book_id: &str) -> Result<Option<AddressBook>, StoreError> {
        Ok(self.inner.read().address_books.get(book_id).cloned())
    }

    async fn contacts_for_book(&self, book_id: &str) -> Result<Vec<Contact>, StoreError> {
        let tables = self.inner.read();
        let mut contacts: Vec<Contact> = tables
            .contacts
            .values()
            .filter(|c| c.address_book_id == book_id)
            .cloned()
            .collect();
        contacts.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(contacts)
    }

    async fn contact(&self, contact_id: &str) -> Result<Option<Contact>, StoreError> {
        Ok(self.inner.read().contacts.get(contact_id).cloned())
    }

    async fn contacts_by_ids(&self, ids: &[String]) -> Result<Vec<Contact>, StoreError> {
        let tables = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.contacts.get(id).cloned())
            .collect())
    }

    async fn upsert_contact(
        &self,
        contact_id: &str,
        book_id: &str,
        draft: ContactDraft,
    ) -> Result<Contact, StoreError> {
        let now = Utc::now();
        let mut tables = self.inner.write();

        let contact = match tables.contacts.get_mut(contact_id) {
            Some(existing) => {
                existing.full_name = draft.full_name;
                if let Some(given_name) = draft.given_name {
                    existing.given_name = Some(given_name);
                }
                if let Some(surname) = draft.surname {
                    existing.surname = Some(surname);
                }
                if let Some(organization) = draft.organization {
                    existing.organization = Some(organization);
                }
                if let Some(emails) = draft.emails {
                    existing.emails = emails;
                }
                if let Some(phones) = draft.phones {
                    existing.phones = phones;
                }
                if let Some(addresses) = draft.addresses {
                    existing.addresses = addresses;
                }
                if let Some(notes) = draft.notes {
                    existing.notes = Some(notes);
                }
                existing.updated_at = now;
                existing.clone()
            },
            None => {
                let contact = Contact {
                    id: contact_id.to_string(),
                    address_book_id: book_id.to_string(),
                    full_name: draft.full_name,
                    given_name: draft.given_name,
                    surname: draft.surname,
                    organization: draft.organization,
                    emails: draft.emails.unwrap_or_default(),
                    phones: draft.phones.unwrap_or_default(),
                    addresses: draft.addresses.unwrap_or_default(),
                    notes: draft.notes,
                    created_at: now,
                    updated_at: now,
                };
                tables.contacts.insert(contact.id.clone(), contact.clone());
                contact
            },
        };
        Ok(contact)
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<bool, StoreError> {
        Ok(self.inner.write().contacts.remove(contact_id).is_some())
    }

    async fn latest_contact_update(
        &self,
        book_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let tables = self.inner.read();
        Ok(tables
            .contacts
            .values()
            .filter(|c| c.address_book_id == book_id)
            .map(|c| c.updated_at)
            .max())
    }
}
