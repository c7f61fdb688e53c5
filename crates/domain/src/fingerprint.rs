//! Derived cache validators
//!
//! ETags and ctags are never stored; both are content hashes over row identity
//! plus the relevant `updated_at`, so they change exactly when the underlying
//! row (or any child of a collection) changes.

use chrono::{DateTime, Utc};

/// ctag value for a collection with no children.
pub const EMPTY_COLLECTION_CTAG: &str = "empty";

/// Compute the ETag for a single resource.
///
/// The tag covers the resource id and its last-modified instant, so two
/// writes that touch the row always yield distinct tags while repeated reads
/// of an unchanged row yield the same one.
#[must_use]
pub fn resource_etag(id: &str, updated_at: Option<DateTime<Utc>>) -> String {
    let stamp = updated_at.map(|t| t.to_rfc3339()).unwrap_or_default();
    blake3::hash(format!("{id}:{stamp}").as_bytes())
        .to_hex()
        .to_string()
}

/// Compute the ctag for a collection from the newest child `updated_at`.
///
/// Collections with no children get the fixed sentinel, which lets clients
/// cache an empty collection without a spurious resync on every poll.
#[must_use]
pub fn collection_ctag(latest_child_update: Option<DateTime<Utc>>) -> String {
    latest_child_update.map_or_else(
        || EMPTY_COLLECTION_CTAG.to_string(),
        |latest| {
            blake3::hash(latest.to_rfc3339().as_bytes())
                .to_hex()
                .to_string()
        },
    )
}
