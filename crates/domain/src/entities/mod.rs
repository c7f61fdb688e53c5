//! Domain entities

pub mod address_book;
pub mod calendar;
pub mod contact;
pub mod event;
pub mod user;

pub use address_book::AddressBook;
pub use calendar::Calendar;
pub use contact::{Contact, ContactDraft, TypedValue};
pub use event::{CalendarEvent, EventDraft, EventStatus};
pub use user::User;
