//! Address book collection entity

use serde::{Deserialize, Serialize};

/// An address book owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBook {
    /// Unique address book identifier; the collection segment in DAV paths
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Display name
    pub name: String,
}

impl AddressBook {
    /// Create an address book
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
        }
    }
}
