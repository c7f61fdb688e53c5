//! iCalendar serialization / deserialization
//!
//! Events ship as a single VEVENT inside a VCALENDAR wrapper. All-day events
//! use date-valued DTSTART/DTEND; timed events are always emitted in UTC.
//! On decode, floating times are taken as UTC and zoned times are converted
//! through the IANA timezone carried in TZID, falling back to UTC for
//! unknown zones.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use domain::{CalendarEvent, EventDraft, EventStatus};
use icalendar::parser::{read_calendar, unfold};
use icalendar::{Calendar, CalendarDateTime, Component, DatePerhapsTime, EventLike, Property, ValueType};

use super::CodecError;

const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";
const DATE_STAMP: &str = "%Y%m%d";

/// Encode an event row as a VCALENDAR document
#[must_use]
pub fn event_to_ical(event: &CalendarEvent) -> String {
    let mut vevent = icalendar::Event::new();
    vevent.uid(&event.id);
    vevent.summary(&event.title);

    if let Some(description) = &event.description {
        vevent.description(description);
    }
    if let Some(location) = &event.location {
        vevent.location(location);
    }

    if event.all_day {
        add_date_property(&mut vevent, "DTSTART", event.start.date_naive());
        add_date_property(&mut vevent, "DTEND", event.end.date_naive());
    } else {
        vevent.add_property("DTSTART", event.start.format(UTC_STAMP).to_string());
        vevent.add_property("DTEND", event.end.format(UTC_STAMP).to_string());
    }

    vevent.add_property("STATUS", event.status.as_ical());
    vevent.add_property("CREATED", event.created_at.format(UTC_STAMP).to_string());
    vevent.add_property(
        "LAST-MODIFIED",
        event.updated_at.format(UTC_STAMP).to_string(),
    );
    vevent.add_property("DTSTAMP", event.updated_at.format(UTC_STAMP).to_string());

    let mut cal = Calendar::new();
    cal.push(vevent.done());
    cal.done().to_string()
}

fn add_date_property(event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format(DATE_STAMP).to_string());
    prop.append_parameter(ValueType::Date);
    event.append_property(prop);
}

/// Decode an iCalendar document into an event draft
///
/// The first VEVENT component wins; DTSTART is required, DTEND falls back to
/// DTSTART when absent. The UID inside the document is ignored, the resource
/// id always comes from the request path.
pub fn ical_to_event_draft(text: &str) -> Result<EventDraft, CodecError> {
    let unfolded = unfold(text);
    let calendar = read_calendar(&unfolded).map_err(|e| CodecError::InvalidICalendar(e.to_string()))?;
    let vevent = calendar
        .components
        .iter()
        .find(|c| c.name == "VEVENT")
        .ok_or_else(|| CodecError::InvalidICalendar("no VEVENT component".to_string()))?;

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();
    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());
    let location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());

    let dtstart = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| CodecError::InvalidICalendar("missing DTSTART".to_string()))?;
    let dtstart = DatePerhapsTime::try_from(dtstart)
        .map_err(|e| CodecError::InvalidICalendar(format!("bad DTSTART: {e}")))?;
    let (start, all_day) = match dtstart {
        DatePerhapsTime::Date(date) => (midnight_utc(date), true),
        DatePerhapsTime::DateTime(dt) => (to_utc(dt), false),
    };

    let end = match vevent.find_prop("DTEND") {
        Some(prop) => {
            let dtend = DatePerhapsTime::try_from(prop)
                .map_err(|e| CodecError::InvalidICalendar(format!("bad DTEND: {e}")))?;
            match dtend {
                DatePerhapsTime::Date(date) => midnight_utc(date),
                DatePerhapsTime::DateTime(dt) => to_utc(dt),
            }
        },
        None => start,
    };

    // Unknown STATUS values are dropped rather than rejected; clients send
    // VTODO-ish values here more often than one would hope.
    let status = vevent
        .find_prop("STATUS")
        .and_then(|p| EventStatus::parse(p.val.as_ref()).ok());

    Ok(EventDraft {
        title,
        description,
        location,
        start: Some(start),
        end: Some(end),
        all_day: Some(all_day),
        status,
    })
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn to_utc(dt: CalendarDateTime) -> DateTime<Utc> {
    match dt {
        CalendarDateTime::Utc(utc) => utc,
        CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
        CalendarDateTime::WithTimezone { date_time, tzid } => tzid
            .parse::<Tz>()
            .ok()
            .and_then(|tz| tz.from_local_datetime(&date_time).single())
            .map_or_else(|| Utc.from_utc_datetime(&date_time), |zoned| zoned.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_event() -> CalendarEvent {
        CalendarEvent {
            id: "ev-1".to_string(),
            calendar_id: "cal-1".to_string(),
            title: "Standup".to_string(),
            description: Some("Daily sync".to_string()),
            location: Some("Room 2".to_string()),
            start: Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap(),
            all_day: false,
            status: EventStatus::Confirmed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn encode_carries_core_properties() {
        let ics = event_to_ical(&sample_event());

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("UID:ev-1"));
        assert!(ics.contains("SUMMARY:Standup"));
        assert!(ics.contains("DESCRIPTION:Daily sync"));
        assert!(ics.contains("LOCATION:Room 2"));
        assert!(ics.contains("DTSTART:20240105T090000Z"));
        assert!(ics.contains("DTEND:20240105T093000Z"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.contains("LAST-MODIFIED:20240102T080000Z"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn encode_all_day_uses_date_values() {
        let mut event = sample_event();
        event.all_day = true;
        let ics = event_to_ical(&event);

        assert!(ics.contains("DTSTART;VALUE=DATE:20240105"));
        assert!(ics.contains("DTEND;VALUE=DATE:20240105"));
    }

    #[test]
    fn decode_round_trips_encoded_event() {
        let ics = event_to_ical(&sample_event());
        let draft = ical_to_event_draft(&ics).unwrap();

        assert_eq!(draft.title, "Standup");
        assert_eq!(draft.description.as_deref(), Some("Daily sync"));
        assert_eq!(draft.location.as_deref(), Some("Room 2"));
        assert_eq!(
            draft.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap())
        );
        assert_eq!(
            draft.end,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap())
        );
        assert_eq!(draft.all_day, Some(false));
        assert_eq!(draft.status, Some(EventStatus::Confirmed));
    }

    #[test]
    fn decode_handles_date_valued_start() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x\r\n\
                   DTSTART;VALUE=DATE:20240105\r\nDTEND;VALUE=DATE:20240106\r\n\
                   SUMMARY:Holiday\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let draft = ical_to_event_draft(ics).unwrap();

        assert_eq!(draft.all_day, Some(true));
        assert_eq!(
            draft.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            draft.end,
            Some(Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn decode_treats_floating_time_as_utc() {
        let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:x\r\n\
                   DTSTART:20240105T090000\r\nSUMMARY:Floaty\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let draft = ical_to_event_draft(ics).unwrap();

        assert_eq!(
            draft.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap())
        );
        // DTEND falls back to DTSTART
        assert_eq!(draft.end, draft.start);
    }

    #[test]
    fn decode_converts_zoned_time_to_utc() {
        let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:x\r\n\
                   DTSTART;TZID=Europe/Berlin:20240105T100000\r\n\
                   SUMMARY:Zoned\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let draft = ical_to_event_draft(ics).unwrap();

        // Berlin is UTC+1 in January
        assert_eq!(
            draft.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn decode_ignores_unknown_status() {
        let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:x\r\n\
                   DTSTART:20240105T090000Z\r\nSTATUS:NEEDS-ACTION\r\n\
                   SUMMARY:X\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let draft = ical_to_event_draft(ics).unwrap();
        assert_eq!(draft.status, None);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(ical_to_event_draft("this is not a calendar").is_err());
    }

    #[test]
    fn decode_rejects_missing_vevent() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
        assert!(ical_to_event_draft(ics).is_err());
    }

    #[test]
    fn decode_rejects_missing_dtstart() {
        let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:x\r\nSUMMARY:X\r\n\
                   END:VEVENT\r\nEND:VCALENDAR\r\n";
        assert!(ical_to_event_draft(ics).is_err());
    }
}
