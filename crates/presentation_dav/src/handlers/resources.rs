//! GET / PUT / DELETE on event and contact resources
//!
//! GET answers 404 for any ownership failure to avoid confirming foreign
//! resource ids; PUT and DELETE answer 403 once the resource (or its target
//! collection) is known to exist under another owner, matching the
//! collection-level authorization model.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use domain::{User, resource_etag};

use crate::codec::{contact_to_vcard, event_to_ical, ical_to_event_draft, vcard_to_contact_draft};
use crate::error::DavError;
use crate::path::{DavPath, resource_href};
use crate::state::AppState;

const ICAL_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";
const VCARD_CONTENT_TYPE: &str = "text/vcard; charset=utf-8";

fn quoted_etag(id: &str, updated_at: chrono::DateTime<chrono::Utc>) -> String {
    format!("\"{}\"", resource_etag(id, Some(updated_at)))
}

/// Answer a GET for a single resource
pub async fn get(state: &AppState, route: &DavPath, user: &User) -> Result<Response, DavError> {
    match route {
        DavPath::Event { event_id, .. } => {
            let event = state
                .calendars
                .event(event_id)
                .await?
                .ok_or(DavError::NotFound)?;
            state
                .calendars
                .calendar(&event.calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .ok_or(DavError::NotFound)?;

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, ICAL_CONTENT_TYPE.to_string()),
                    (header::ETAG, quoted_etag(&event.id, event.updated_at)),
                ],
                event_to_ical(&event),
            )
                .into_response())
        },

        DavPath::Contact { contact_id, .. } => {
            let contact = state
                .contacts
                .contact(contact_id)
                .await?
                .ok_or(DavError::NotFound)?;
            state
                .contacts
                .address_book(&contact.address_book_id)
                .await?
                .filter(|b| b.user_id == user.id)
                .ok_or(DavError::NotFound)?;

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, VCARD_CONTENT_TYPE.to_string()),
                    (header::ETAG, quoted_etag(&contact.id, contact.updated_at)),
                ],
                contact_to_vcard(&contact),
            )
                .into_response())
        },

        _ => Err(DavError::NotFound),
    }
}

/// Answer a PUT: upsert under the client-supplied resource id
///
/// Responds 201 with `ETag` and `Location` on update as well as create; the
/// two cases are not distinguished.
pub async fn put(
    state: &AppState,
    route: &DavPath,
    user: &User,
    body: &[u8],
) -> Result<Response, DavError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| DavError::BadRequest("body is not UTF-8".to_string()))?;
    let mount = state.mount();

    match route {
        DavPath::Event {
            calendar_id,
            event_id,
            ..
        } => {
            // The target collection must exist and be owned by the caller;
            // the resource itself may not exist yet.
            let calendar = state
                .calendars
                .calendar(calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .ok_or(DavError::Forbidden)?;

            let draft = ical_to_event_draft(text)?;
            let event = state
                .calendars
                .upsert_event(event_id, &calendar.id, draft)
                .await?;

            let href = resource_href(
                mount,
                &[
                    "calendars",
                    &user.username,
                    &calendar.id,
                    &format!("{}.ics", event.id),
                ],
            );
            Ok((
                StatusCode::CREATED,
                [
                    (header::ETAG, quoted_etag(&event.id, event.updated_at)),
                    (header::LOCATION, href),
                ],
            )
                .into_response())
        },

        DavPath::Contact {
            book_id,
            contact_id,
            ..
        } => {
            let book = state
                .contacts
                .address_book(book_id)
                .await?
                .filter(|b| b.user_id == user.id)
                .ok_or(DavError::Forbidden)?;

            let draft = vcard_to_contact_draft(text)?;
            let contact = state
                .contacts
                .upsert_contact(contact_id, &book.id, draft)
                .await?;

            let href = resource_href(
                mount,
                &[
                    "addressbooks",
                    &user.username,
                    &book.id,
                    &format!("{}.vcf", contact.id),
                ],
            );
            Ok((
                StatusCode::CREATED,
                [
                    (header::ETAG, quoted_etag(&contact.id, contact.updated_at)),
                    (header::LOCATION, href),
                ],
            )
                .into_response())
        },

        _ => Err(DavError::Forbidden),
    }
}

/// Answer a DELETE: 404 for absent resources, 403 when the ownership chain
/// ends at another user
pub async fn delete(state: &AppState, route: &DavPath, user: &User) -> Result<Response, DavError> {
    match route {
        DavPath::Event { event_id, .. } => {
            let event = state
                .calendars
                .event(event_id)
                .await?
                .ok_or(DavError::NotFound)?;
            state
                .calendars
                .calendar(&event.calendar_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .ok_or(DavError::Forbidden)?;

            state.calendars.delete_event(event_id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        },

        DavPath::Contact { contact_id, .. } => {
            let contact = state
                .contacts
                .contact(contact_id)
                .await?
                .ok_or(DavError::NotFound)?;
            state
                .contacts
                .address_book(&contact.address_book_id)
                .await?
                .filter(|b| b.user_id == user.id)
                .ok_or(DavError::Forbidden)?;

            state.contacts.delete_contact(contact_id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        },

        _ => Err(DavError::Forbidden),
    }
}
