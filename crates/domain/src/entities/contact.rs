//! Contact entity and write draft

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A labelled value, as used for emails, phones and addresses
///
/// Labels are stored lowercase (`home`, `work`, ...) and upper-cased on the
/// vCard wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    /// vCard TYPE parameter, lowercase
    #[serde(rename = "type")]
    pub type_label: String,
    /// The value itself
    pub value: String,
}

impl TypedValue {
    /// Create a typed value
    pub fn new(type_label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
            value: value.into(),
        }
    }

    /// Create a value with the default `home` label
    pub fn home(value: impl Into<String>) -> Self {
        Self::new("home", value)
    }
}

/// A contact card
///
/// Like events, the id is chosen by the client on PUT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Client-supplied resource identifier
    pub id: String,
    /// Owning address book id
    pub address_book_id: String,
    /// Formatted display name (FN)
    pub full_name: String,
    /// Given name (N given component)
    pub given_name: Option<String>,
    /// Surname (N family component)
    pub surname: Option<String>,
    /// Organization (ORG)
    pub organization: Option<String>,
    /// Email addresses with labels
    pub emails: Vec<TypedValue>,
    /// Phone numbers with labels
    pub phones: Vec<TypedValue>,
    /// Street addresses with labels; the value holds the street component
    pub addresses: Vec<TypedValue>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Row update time; drives the ETag
    pub updated_at: DateTime<Utc>,
}

/// Fields decoded from an incoming vCard
///
/// List fields are `Some` only when the card carried at least one entry, so
/// an update without EMAIL lines keeps the stored emails, matching the event
/// draft semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    /// FN; empty string when absent
    pub full_name: String,
    /// N given component when present
    pub given_name: Option<String>,
    /// N family component when present
    pub surname: Option<String>,
    /// ORG when present
    pub organization: Option<String>,
    /// EMAIL entries when present
    pub emails: Option<Vec<TypedValue>>,
    /// TEL entries when present
    pub phones: Option<Vec<TypedValue>>,
    /// ADR entries when present
    pub addresses: Option<Vec<TypedValue>>,
    /// NOTE when present
    pub notes: Option<String>,
}
