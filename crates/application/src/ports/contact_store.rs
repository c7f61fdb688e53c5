//! Contact store port
//!
//! The address-book mirror of the calendar store boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AddressBook, Contact, ContactDraft};
#[cfg(test)]
use mockall::automock;

use super::StoreError;

/// Port for address book and contact persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// List the address books owned by a user, ordered by name
    async fn address_books_for_user(&self, user_id: &str) -> Result<Vec<AddressBook>, StoreError>;

    /// Fetch an address book by id
    async fn address_book(&self, book_id: &str) -> Result<Option<AddressBook>, StoreError>;

    /// List the contacts of an address book, ordered by display name
    async fn contacts_for_book(&self, book_id: &str) -> Result<Vec<Contact>, StoreError>;

    /// Fetch a contact by id
    async fn contact(&self, contact_id: &str) -> Result<Option<Contact>, StoreError>;

    /// Fetch the contacts whose ids appear in `ids`; missing ids are skipped
    async fn contacts_by_ids(&self, ids: &[String]) -> Result<Vec<Contact>, StoreError>;

    /// Insert or update a contact under the client-supplied id
    async fn upsert_contact(
        &self,
        contact_id: &str,
        book_id: &str,
        draft: ContactDraft,
    ) -> Result<Contact, StoreError>;

    /// Delete a contact; returns `false` when no row existed
    async fn delete_contact(&self, contact_id: &str) -> Result<bool, StoreError>;

    /// Newest `updated_at` among a book's contacts, for the ctag
    async fn latest_contact_update(
        &self,
        book_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;
}
