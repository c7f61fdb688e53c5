//! DAV path resolution
//!
//! DAV paths are a resource hierarchy, not REST routes: the username and the
//! collection id are embedded in the path, and resource leaves carry a format
//! extension. Paths arrive here with the mount prefix already stripped.

/// A resolved DAV path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DavPath {
    /// The mount root
    Root,
    /// `/principals/{username}/`
    Principal { username: String },
    /// `/calendars/{username}/`
    CalendarHome { username: String },
    /// `/calendars/{username}/{calendar_id}/`
    Calendar {
        username: String,
        calendar_id: String,
    },
    /// `/calendars/{username}/{calendar_id}/{event_id}.ics`
    Event {
        username: String,
        calendar_id: String,
        event_id: String,
    },
    /// `/addressbooks/{username}/`
    AddressBookHome { username: String },
    /// `/addressbooks/{username}/{book_id}/`
    AddressBook { username: String, book_id: String },
    /// `/addressbooks/{username}/{book_id}/{contact_id}.vcf`
    Contact {
        username: String,
        book_id: String,
        contact_id: String,
    },
    /// Anything else; every method answers 404
    Unknown,
}

impl DavPath {
    /// Parse a mount-relative path
    ///
    /// Empty segments are dropped, so `//calendars//alice/` resolves like
    /// `/calendars/alice/`. Resource leaves must carry the `.ics`/`.vcf`
    /// extension; the extension is stripped from the resource id.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [] => Self::Root,
            ["principals", username] => Self::Principal {
                username: (*username).to_string(),
            },
            ["calendars", username] => Self::CalendarHome {
                username: (*username).to_string(),
            },
            ["calendars", username, calendar_id] => Self::Calendar {
                username: (*username).to_string(),
                calendar_id: (*calendar_id).to_string(),
            },
            ["calendars", username, calendar_id, resource] => {
                resource.strip_suffix(".ics").map_or(Self::Unknown, |id| {
                    Self::Event {
                        username: (*username).to_string(),
                        calendar_id: (*calendar_id).to_string(),
                        event_id: id.to_string(),
                    }
                })
            },
            ["addressbooks", username] => Self::AddressBookHome {
                username: (*username).to_string(),
            },
            ["addressbooks", username, book_id] => Self::AddressBook {
                username: (*username).to_string(),
                book_id: (*book_id).to_string(),
            },
            ["addressbooks", username, book_id, resource] => {
                resource.strip_suffix(".vcf").map_or(Self::Unknown, |id| {
                    Self::Contact {
                        username: (*username).to_string(),
                        book_id: (*book_id).to_string(),
                        contact_id: id.to_string(),
                    }
                })
            },
            _ => Self::Unknown,
        }
    }

    /// The username segment, when the path carries one
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Principal { username }
            | Self::CalendarHome { username }
            | Self::Calendar { username, .. }
            | Self::Event { username, .. }
            | Self::AddressBookHome { username }
            | Self::AddressBook { username, .. }
            | Self::Contact { username, .. } => Some(username),
            Self::Root | Self::Unknown => None,
        }
    }

    /// The resource id for Event/Contact paths
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Self::Event { event_id, .. } => Some(event_id),
            Self::Contact { contact_id, .. } => Some(contact_id),
            _ => None,
        }
    }
}

/// Build a collection href (trailing slash) under the mount prefix
#[must_use]
pub fn collection_href(mount: &str, segments: &[&str]) -> String {
    format!("{mount}/{}/", segments.join("/"))
}

/// Build a resource href (no trailing slash) under the mount prefix
#[must_use]
pub fn resource_href(mount: &str, segments: &[&str]) -> String {
    format!("{mount}/{}", segments.join("/"))
}

/// Recover a resource id from an href in a multiget REPORT
///
/// Clients may send absolute URLs or server-relative paths; everything up to
/// (and including) the last occurrence of the mount prefix is dropped before
/// resolving. Returns `None` for hrefs that do not resolve to a resource.
#[must_use]
pub fn resource_id_from_href(mount: &str, href: &str) -> Option<String> {
    let relative = if mount.is_empty() {
        href
    } else {
        href.rfind(mount)
            .map_or(href, |idx| &href[idx + mount.len()..])
    };
    DavPath::parse(relative)
        .resource_id()
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_root() {
        assert_eq!(DavPath::parse("/"), DavPath::Root);
        assert_eq!(DavPath::parse(""), DavPath::Root);
    }

    #[test]
    fn parses_principal() {
        assert_eq!(
            DavPath::parse("/principals/alice/"),
            DavPath::Principal {
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn parses_calendar_hierarchy() {
        assert_eq!(
            DavPath::parse("/calendars/alice"),
            DavPath::CalendarHome {
                username: "alice".to_string()
            }
        );
        assert_eq!(
            DavPath::parse("/calendars/alice/cal1/"),
            DavPath::Calendar {
                username: "alice".to_string(),
                calendar_id: "cal1".to_string()
            }
        );
        assert_eq!(
            DavPath::parse("/calendars/alice/cal1/ev1.ics"),
            DavPath::Event {
                username: "alice".to_string(),
                calendar_id: "cal1".to_string(),
                event_id: "ev1".to_string()
            }
        );
    }

    #[test]
    fn parses_addressbook_hierarchy() {
        assert_eq!(
            DavPath::parse("/addressbooks/alice/"),
            DavPath::AddressBookHome {
                username: "alice".to_string()
            }
        );
        assert_eq!(
            DavPath::parse("/addressbooks/alice/book1"),
            DavPath::AddressBook {
                username: "alice".to_string(),
                book_id: "book1".to_string()
            }
        );
        assert_eq!(
            DavPath::parse("/addressbooks/alice/book1/c1.vcf"),
            DavPath::Contact {
                username: "alice".to_string(),
                book_id: "book1".to_string(),
                contact_id: "c1".to_string()
            }
        );
    }

    #[test]
    fn resource_without_extension_is_unknown() {
        assert_eq!(DavPath::parse("/calendars/alice/cal1/ev1"), DavPath::Unknown);
        assert_eq!(
            DavPath::parse("/addressbooks/alice/book1/c1.ics"),
            DavPath::Unknown
        );
    }

    #[test]
    fn deep_and_foreign_paths_are_unknown() {
        assert_eq!(DavPath::parse("/calendars/a/b/c/d"), DavPath::Unknown);
        assert_eq!(DavPath::parse("/mail/inbox"), DavPath::Unknown);
        assert_eq!(DavPath::parse("/principals"), DavPath::Unknown);
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(
            DavPath::parse("//calendars//alice//"),
            DavPath::CalendarHome {
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn username_accessor() {
        assert_eq!(DavPath::parse("/principals/alice/").username(), Some("alice"));
        assert_eq!(DavPath::parse("/").username(), None);
        assert_eq!(DavPath::parse("/junk/x/y/z/w").username(), None);
    }

    #[test]
    fn href_builders() {
        assert_eq!(
            collection_href("/dav", &["calendars", "alice"]),
            "/dav/calendars/alice/"
        );
        assert_eq!(
            resource_href("/dav", &["calendars", "alice", "cal1", "ev1.ics"]),
            "/dav/calendars/alice/cal1/ev1.ics"
        );
        assert_eq!(collection_href("", &["principals", "alice"]), "/principals/alice/");
    }

    #[test]
    fn resource_id_from_relative_href() {
        assert_eq!(
            resource_id_from_href("/dav", "/dav/calendars/alice/cal1/ev1.ics"),
            Some("ev1".to_string())
        );
    }

    #[test]
    fn resource_id_from_absolute_href() {
        assert_eq!(
            resource_id_from_href(
                "/dav",
                "https://portal.example.com/dav/addressbooks/alice/book1/c1.vcf"
            ),
            Some("c1".to_string())
        );
    }

    #[test]
    fn resource_id_from_collection_href_is_none() {
        assert_eq!(resource_id_from_href("/dav", "/dav/calendars/alice/cal1/"), None);
    }

    proptest! {
        // The resolver must be total: arbitrary input never panics and
        // either yields a typed route or Unknown.
        #[test]
        fn parse_never_panics(path in "[a-z0-9/._-]{0,64}") {
            let _ = DavPath::parse(&path);
        }

        #[test]
        fn event_paths_always_round_trip(
            user in "[a-z][a-z0-9]{0,8}",
            cal in "[a-z][a-z0-9]{0,8}",
            id in "[a-z][a-z0-9]{0,8}",
        ) {
            let path = format!("/calendars/{user}/{cal}/{id}.ics");
            prop_assert_eq!(
                DavPath::parse(&path),
                DavPath::Event {
                    username: user,
                    calendar_id: cal,
                    event_id: id,
                }
            );
        }
    }
}
