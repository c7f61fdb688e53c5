//! PROPFIND handler
//!
//! Depth 0 answers for the addressed resource alone; Depth 1 additionally
//! enumerates immediate children. Ownership failures on the addressed
//! resource answer 404 rather than 403 so foreign resource ids stay
//! unconfirmed.

use axum::response::Response;
use domain::{User, collection_ctag};

use super::multistatus_response;
use crate::error::DavError;
use crate::path::{DavPath, collection_href, resource_href};
use crate::props;
use crate::state::AppState;
use crate::xml::{Multistatus, parse_propfind};

/// PROPFIND depth; the DAV tree is shallow, `infinity` is treated as 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Addressed resource only
    Zero,
    /// Addressed resource plus immediate children
    One,
}

impl Depth {
    /// Parse the `Depth` header; missing defaults to 1
    #[must_use]
    pub fn parse(header: Option<&str>) -> Self {
        match header {
            Some("0") => Self::Zero,
            _ => Self::One,
        }
    }
}

/// Answer a PROPFIND request
pub async fn propfind(
    state: &AppState,
    route: &DavPath,
    user: &User,
    depth: Depth,
    body: &[u8],
) -> Result<Response, DavError> {
    // Requested property names are accepted but the standard set per
    // resource type is returned either way; a malformed body is still a 400.
    parse_propfind(body)?;

    let mount = state.mount();
    let username = user.username.as_str();
    let mut ms = Multistatus::new();

    match route {
        DavPath::Root => {
            ms.add_response(&format!("{mount}/"), props::prop_root(mount, username));
            if depth == Depth::One {
                ms.add_response(
                    &collection_href(mount, &["principals", username]),
                    props::prop_principal(mount, username),
                );
            }
        },

        DavPath::Principal { .. } => {
            ms.add_response(
                &collection_href(mount, &["principals", username]),
                props::prop_principal(mount, username),
            );
        },

        DavPath::CalendarHome { .. } => {
            ms.add_response(
                &collection_href(mount, &["calendars", username]),
                props::prop_calendar_home(username),
            );
            if depth == Depth::One {
                for calendar in state.calendars.calendars_for_user(&user.id).await? {
                    let ctag =
                        collection_ctag(state.calendars.latest_event_update(&calendar.id).await?);
                    ms.add_response(
                        &collection_href(mount, &["calendars", username, &calendar.id]),
                        props::prop_calendar(&calendar, &ctag),
                    );
                }
            }
        },

        DavPath::Calendar { calendar_id, .. } => {
            let calendar = state
                .calendars
                .calendar(calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .ok_or(DavError::NotFound)?;
            let ctag = collection_ctag(state.calendars.latest_event_update(&calendar.id).await?);
            ms.add_response(
                &collection_href(mount, &["calendars", username, &calendar.id]),
                props::prop_calendar(&calendar, &ctag),
            );
            if depth == Depth::One {
                for event in state.calendars.events_for_calendar(&calendar.id).await? {
                    ms.add_response(
                        &resource_href(
                            mount,
                            &[
                                "calendars",
                                username,
                                &calendar.id,
                                &format!("{}.ics", event.id),
                            ],
                        ),
                        props::prop_event(&event, false),
                    );
                }
            }
        },

        DavPath::Event { event_id, .. } => {
            let event = state
                .calendars
                .event(event_id)
                .await?
                .ok_or(DavError::NotFound)?;
            let calendar = state
                .calendars
                .calendar(&event.calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .ok_or(DavError::NotFound)?;
            ms.add_response(
                &resource_href(
                    mount,
                    &[
                        "calendars",
                        username,
                        &calendar.id,
                        &format!("{}.ics", event.id),
                    ],
                ),
                props::prop_event(&event, false),
            );
        },

        DavPath::AddressBookHome { .. } => {
            ms.add_response(
                &collection_href(mount, &["addressbooks", username]),
                props::prop_addressbook_home(username),
            );
            if depth == Depth::One {
                for book in state.contacts.address_books_for_user(&user.id).await? {
                    let ctag =
                        collection_ctag(state.contacts.latest_contact_update(&book.id).await?);
                    ms.add_response(
                        &collection_href(mount, &["addressbooks", username, &book.id]),
                        props::prop_addressbook(&book, &ctag),
                    );
                }
            }
        },

        DavPath::AddressBook { book_id, .. } => {
            let book = state
                .contacts
                .address_book(book_id)
                .await?
                .filter(|b| b.user_id == user.id)
                .ok_or(DavError::NotFound)?;
            let ctag = collection_ctag(state.contacts.latest_contact_update(&book.id).await?);
            ms.add_response(
                &collection_href(mount, &["addressbooks", username, &book.id]),
                props::prop_addressbook(&book, &ctag),
            );
            if depth == Depth::One {
                for contact in state.contacts.contacts_for_book(&book.id).await? {
                    ms.add_response(
                        &resource_href(
                            mount,
                            &[
                                "addressbooks",
                                username,
                                &book.id,
                                &format!("{}.vcf", contact.id),
                            ],
                        ),
                        props::prop_contact(&contact, false),
                    );
                }
            }
        },

        DavPath::Contact { contact_id, .. } => {
            let contact = state
                .contacts
                .contact(contact_id)
                .await?
                .ok_or(DavError::NotFound)?;
            let book = state
                .contacts
                .address_book(&contact.address_book_id)
                .await?
                .filter(|b| b.user_id == user.id)
                .ok_or(DavError::NotFound)?;
            ms.add_response(
                &resource_href(
                    mount,
                    &[
                        "addressbooks",
                        username,
                        &book.id,
                        &format!("{}.vcf", contact.id),
                    ],
                ),
                props::prop_contact(&contact, false),
            );
        },

        DavPath::Unknown => return Err(DavError::NotFound),
    }

    Ok(multistatus_response(&ms))
}
