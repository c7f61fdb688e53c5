//! REPORT handler
//!
//! Supports the multiget and query variants of the CalDAV and CardDAV
//! reports. Query filters (time-range, prop-filter) are parsed and ignored:
//! the full collection comes back, which over-fetches but stays correct for
//! syncing clients. Multiget hrefs are scoped to rows the authenticated user
//! owns; foreign hrefs are silently dropped from the response.

use axum::response::Response;
use domain::User;
use tracing::debug;

use super::multistatus_response;
use crate::error::DavError;
use crate::path::{DavPath, resource_href, resource_id_from_href};
use crate::props;
use crate::state::AppState;
use crate::xml::{Multistatus, parse_report};

/// Answer a REPORT request
pub async fn report(
    state: &AppState,
    route: &DavPath,
    user: &User,
    body: &[u8],
) -> Result<Response, DavError> {
    let request = parse_report(body)?;
    let mount = state.mount();
    let username = user.username.as_str();
    let mut ms = Multistatus::new();

    match (route, request.name.as_str()) {
        (DavPath::Calendar { .. }, "calendar-multiget") => {
            let ids: Vec<String> = request
                .hrefs
                .iter()
                .filter_map(|href| resource_id_from_href(mount, href))
                .collect();
            debug!(requested = request.hrefs.len(), resolved = ids.len(), "calendar-multiget");
            for event in state.calendars.events_by_ids(&ids).await? {
                let Some(calendar) = state.calendars.calendar(&event.calendar_id).await? else {
                    continue;
                };
                if calendar.user_id != user.id {
                    continue;
                }
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
                    props::prop_event(&event, true),
                );
            }
        },

        (DavPath::Calendar { calendar_id, .. }, "calendar-query") => {
            if let Some(calendar) = state
                .calendars
                .calendar(calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
            {
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
                        props::prop_event(&event, true),
                    );
                }
            }
        },

        (DavPath::AddressBook { .. }, "addressbook-multiget") => {
            let ids: Vec<String> = request
                .hrefs
                .iter()
                .filter_map(|href| resource_id_from_href(mount, href))
                .collect();
            debug!(requested = request.hrefs.len(), resolved = ids.len(), "addressbook-multiget");
            for contact in state.contacts.contacts_by_ids(&ids).await? {
                let Some(book) = state.contacts.address_book(&contact.address_book_id).await?
                else {
                    continue;
                };
                if book.user_id != user.id {
                    continue;
                }
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
                    props::prop_contact(&contact, true),
                );
            }
        },

        (DavPath::AddressBook { book_id, .. }, "addressbook-query") => {
            if let Some(book) = state
                .contacts
                .address_book(book_id)
                .await?
                .filter(|b| b.user_id == user.id)
            {
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
                        props::prop_contact(&contact, true),
                    );
                }
            }
        },

        (_, name) => {
            debug!(report = name, "unsupported report for route");
            return Err(DavError::Forbidden);
        },
    }

    Ok(multistatus_response(&ms))
}
