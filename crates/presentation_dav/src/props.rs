//! WebDAV property-tree builders
//!
//! Pure functions from fetched rows (plus precomputed ctags) to the `D:prop`
//! element a PROPFIND or REPORT response carries. Handlers fetch, these
//! build; nothing here touches the store.

use domain::{AddressBook, Calendar, CalendarEvent, Contact, resource_etag};

use crate::codec::{contact_to_vcard, event_to_ical};
use crate::path::collection_href;
use crate::xml::{XmlElement, apple_ical, caldav, calendarserver, carddav, dav};

const EVENT_CONTENT_TYPE: &str = "text/calendar; charset=utf-8; component=VEVENT";
const CONTACT_CONTENT_TYPE: &str = "text/vcard; charset=utf-8";

fn resourcetype(markers: &[String]) -> XmlElement {
    let mut rt = XmlElement::new(dav("resourcetype")).child(XmlElement::new(dav("collection")));
    for marker in markers {
        rt.push(XmlElement::new(marker.clone()));
    }
    rt
}

fn supported_report_set(reports: &[String]) -> XmlElement {
    let mut set = XmlElement::new(dav("supported-report-set"));
    for report in reports {
        set.push(
            XmlElement::new(dav("supported-report")).child(
                XmlElement::new(dav("report")).child(XmlElement::new(report.clone())),
            ),
        );
    }
    set
}

fn quoted_etag(id: &str, updated_at: chrono::DateTime<chrono::Utc>) -> String {
    format!("\"{}\"", resource_etag(id, Some(updated_at)))
}

/// Properties of the mount root
#[must_use]
pub fn prop_root(mount: &str, username: &str) -> XmlElement {
    XmlElement::new(dav("prop"))
        .child(resourcetype(&[]))
        .child(
            XmlElement::new(dav("current-user-principal")).child(XmlElement::with_text(
                dav("href"),
                collection_href(mount, &["principals", username]),
            )),
        )
        .child(XmlElement::with_text(dav("displayname"), "WebDAV Root"))
}

/// Properties of a principal, with home-set discovery pointers
#[must_use]
pub fn prop_principal(mount: &str, username: &str) -> XmlElement {
    XmlElement::new(dav("prop"))
        .child(resourcetype(&[dav("principal")]))
        .child(XmlElement::with_text(dav("displayname"), username))
        .child(
            XmlElement::new(caldav("calendar-home-set")).child(XmlElement::with_text(
                dav("href"),
                collection_href(mount, &["calendars", username]),
            )),
        )
        .child(
            XmlElement::new(carddav("addressbook-home-set")).child(XmlElement::with_text(
                dav("href"),
                collection_href(mount, &["addressbooks", username]),
            )),
        )
}

/// Properties of a user's calendar home
#[must_use]
pub fn prop_calendar_home(username: &str) -> XmlElement {
    XmlElement::new(dav("prop"))
        .child(resourcetype(&[]))
        .child(XmlElement::with_text(
            dav("displayname"),
            format!("{username} calendars"),
        ))
}

/// Properties of a calendar collection
#[must_use]
pub fn prop_calendar(calendar: &Calendar, ctag: &str) -> XmlElement {
    let mut prop = XmlElement::new(dav("prop"))
        .child(resourcetype(&[caldav("calendar")]))
        .child(XmlElement::with_text(dav("displayname"), &calendar.name));
    if let Some(color) = &calendar.color {
        prop.push(XmlElement::with_text(apple_ical("calendar-color"), color));
    }
    prop = prop
        .child(XmlElement::with_text(calendarserver("getctag"), ctag))
        .child(
            XmlElement::new(caldav("supported-calendar-component-set"))
                .child(XmlElement::new(caldav("comp")).attr("name", "VEVENT")),
        )
        .child(supported_report_set(&[
            caldav("calendar-multiget"),
            caldav("calendar-query"),
        ]));
    prop
}

/// Properties of an event resource; payload inlined when `with_data`
#[must_use]
pub fn prop_event(event: &CalendarEvent, with_data: bool) -> XmlElement {
    let mut prop = XmlElement::new(dav("prop"))
        .child(XmlElement::with_text(
            dav("getetag"),
            quoted_etag(&event.id, event.updated_at),
        ))
        .child(XmlElement::with_text(
            dav("getcontenttype"),
            EVENT_CONTENT_TYPE,
        ));
    if with_data {
        prop.push(XmlElement::with_text(
            caldav("calendar-data"),
            event_to_ical(event),
        ));
    }
    prop
}

/// Properties of a user's address book home
#[must_use]
pub fn prop_addressbook_home(username: &str) -> XmlElement {
    XmlElement::new(dav("prop"))
        .child(resourcetype(&[]))
        .child(XmlElement::with_text(
            dav("displayname"),
            format!("{username} address books"),
        ))
}

/// Properties of an address book collection
#[must_use]
pub fn prop_addressbook(book: &AddressBook, ctag: &str) -> XmlElement {
    XmlElement::new(dav("prop"))
        .child(resourcetype(&[carddav("addressbook")]))
        .child(XmlElement::with_text(dav("displayname"), &book.name))
        .child(XmlElement::with_text(calendarserver("getctag"), ctag))
        .child(supported_report_set(&[
            carddav("addressbook-multiget"),
            carddav("addressbook-query"),
        ]))
}

/// Properties of a contact resource; payload inlined when `with_data`
#[must_use]
pub fn prop_contact(contact: &Contact, with_data: bool) -> XmlElement {
    let mut prop = XmlElement::new(dav("prop"))
        .child(XmlElement::with_text(
            dav("getetag"),
            quoted_etag(&contact.id, contact.updated_at),
        ))
        .child(XmlElement::with_text(
            dav("getcontenttype"),
            CONTACT_CONTENT_TYPE,
        ));
    if with_data {
        prop.push(XmlElement::with_text(
            carddav("address-data"),
            contact_to_vcard(contact),
        ));
    }
    prop
}
