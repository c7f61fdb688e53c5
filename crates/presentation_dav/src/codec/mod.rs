//! Wire-format codecs
//!
//! Pure translation between store rows and the two line-oriented text
//! formats DAV clients speak: iCalendar for events, vCard for contacts.

pub mod ical;
pub mod vcard;

use thiserror::Error;

pub use ical::{event_to_ical, ical_to_event_draft};
pub use vcard::{contact_to_vcard, vcard_to_contact_draft};

/// Errors from decoding a client payload
#[derive(Debug, Error)]
pub enum CodecError {
    /// The body is not a usable iCalendar document
    #[error("Invalid iCalendar document: {0}")]
    InvalidICalendar(String),

    /// The body is not a usable vCard
    #[error("Invalid vCard document: {0}")]
    InvalidVCard(String),
}
