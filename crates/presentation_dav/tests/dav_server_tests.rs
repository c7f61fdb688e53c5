//! End-to-end tests against the DAV router
//!
//! Each test drives the real router (dispatcher, auth gate, handlers, XML
//! assembly, codecs) over an in-memory store with argon2-hashed passwords.

use std::sync::Arc;

use application::AuthService;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::{Calendar, User};
use infrastructure::{DavConfig, MemoryStore, PasswordHasher};
use presentation_dav::{AppState, create_router};
use tower::ServiceExt;

const ALICE_PASSWORD: &str = "alice-secret";
const BOB_PASSWORD: &str = "bob-secret";

struct TestPortal {
    app: Router,
    alice: User,
    alice_calendar: Calendar,
    alice_book_id: String,
    bob_calendar_id: String,
}

fn setup() -> TestPortal {
    let hasher = PasswordHasher::new();
    let store = Arc::new(MemoryStore::new());

    let (alice, alice_calendar, alice_book) =
        store.provision_account("alice", &hasher.hash(ALICE_PASSWORD).unwrap());
    let (_bob, bob_calendar, _bob_book) =
        store.provision_account("bob", &hasher.hash(BOB_PASSWORD).unwrap());

    let state = AppState {
        auth: AuthService::new(store.clone(), Arc::new(hasher)),
        calendars: store.clone(),
        contacts: store,
        dav: Arc::new(DavConfig::default()),
    };

    TestPortal {
        app: create_router(state),
        alice,
        alice_calendar,
        alice_book_id: alice_book.id,
        bob_calendar_id: bob_calendar.id,
    }
}

fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}

struct Req<'a> {
    method: &'a str,
    path: &'a str,
    auth: Option<(&'a str, &'a str)>,
    depth: Option<&'a str>,
    body: &'a str,
}

impl<'a> Req<'a> {
    fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            auth: None,
            depth: None,
            body: "",
        }
    }

    fn as_user(mut self, user: &'a str, password: &'a str) -> Self {
        self.auth = Some((user, password));
        self
    }

    fn depth(mut self, depth: &'a str) -> Self {
        self.depth = Some(depth);
        self
    }

    fn body(mut self, body: &'a str) -> Self {
        self.body = body;
        self
    }
}

async fn send(app: &Router, req: Req<'_>) -> Response<Body> {
    let mut builder = Request::builder().method(req.method).uri(req.path);
    if let Some((user, password)) = req.auth {
        builder = builder.header(header::AUTHORIZATION, basic(user, password));
    }
    if let Some(depth) = req.depth {
        builder = builder.header("Depth", depth);
    }
    let request = builder.body(Body::from(req.body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn response_count(body: &str) -> usize {
    body.matches("<D:response>").count()
}

fn header_value(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

async fn probe_ctag(app: &Router, cal_path: &str) -> String {
    let response = send(
        app,
        Req::new("PROPFIND", cal_path)
            .as_user("alice", ALICE_PASSWORD)
            .depth("0"),
    )
    .await;
    extract_ctag(&body_text(response).await)
}

fn extract_ctag(body: &str) -> String {
    let start = body.find("<CS:getctag>").expect("ctag present") + "<CS:getctag>".len();
    let end = body[start..].find("</CS:getctag>").expect("ctag closed") + start;
    body[start..end].to_string()
}

fn standup_ics() -> String {
    "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:ev1\r\n\
     DTSTAMP:20240104T120000Z\r\nDTSTART:20240105T090000Z\r\nDTEND:20240105T093000Z\r\n\
     SUMMARY:Standup\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
        .to_string()
}

fn ics_with_summary(summary: &str) -> String {
    standup_ics().replace("SUMMARY:Standup", &format!("SUMMARY:{summary}"))
}

// ── Authentication ──

#[tokio::test]
async fn request_without_credentials_is_challenged() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/").depth("1"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        header_value(&response, "www-authenticate").as_deref(),
        Some("Basic realm=\"WebDAV\"")
    );
    // Capability headers ride on every response from the subsystem
    assert_eq!(
        header_value(&response, "dav").as_deref(),
        Some("1, 3, calendar-access, addressbook")
    );
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/").as_user("alice", "not-her-password"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn username_mismatch_is_forbidden_not_hidden() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/calendars/bob/").as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ── OPTIONS ──

#[tokio::test]
async fn options_announces_capabilities() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("OPTIONS", "/dav/").as_user("alice", ALICE_PASSWORD),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, "dav").as_deref(),
        Some("1, 3, calendar-access, addressbook")
    );
    assert_eq!(
        header_value(&response, "allow").as_deref(),
        Some("OPTIONS, PROPFIND, REPORT, GET, PUT, DELETE")
    );
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("POST", "/dav/calendars/alice/").as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Discovery ──

#[tokio::test]
async fn well_known_redirects_to_mount_root() {
    let portal = setup();
    for path in ["/.well-known/caldav", "/.well-known/carddav"] {
        let response = send(&portal.app, Req::new("GET", path)).await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(header_value(&response, "location").as_deref(), Some("/dav/"));
    }
}

// ── PROPFIND ──

#[tokio::test]
async fn propfind_root_depth_zero_has_one_response() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/")
            .as_user("alice", ALICE_PASSWORD)
            .depth("0"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    assert_eq!(
        header_value(&response, "content-type").as_deref(),
        Some("application/xml; charset=utf-8")
    );
    let body = body_text(response).await;
    assert_eq!(response_count(&body), 1);
    assert!(body.contains("<D:current-user-principal>"));
}

#[tokio::test]
async fn propfind_root_depth_one_adds_principal() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/")
            .as_user("alice", ALICE_PASSWORD)
            .depth("1"),
    )
    .await;

    let body = body_text(response).await;
    assert_eq!(response_count(&body), 2);
    assert!(body.contains("<D:href>/dav/principals/alice/</D:href>"));
    assert!(body.contains("<C:calendar-home-set>"));
    assert!(body.contains("<CR:addressbook-home-set>"));
}

#[tokio::test]
async fn propfind_calendar_home_lists_calendars() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/calendars/alice/")
            .as_user("alice", ALICE_PASSWORD)
            .depth("1"),
    )
    .await;

    let body = body_text(response).await;
    assert_eq!(response_count(&body), 2);
    assert!(body.contains(&format!(
        "<D:href>/dav/calendars/alice/{}/</D:href>",
        portal.alice_calendar.id
    )));
    assert!(body.contains("<CS:getctag>"));
    assert!(body.contains("<C:calendar-multiget/>"));
}

#[tokio::test]
async fn propfind_depth_semantics_on_calendar() {
    let portal = setup();
    let cal_path = format!("/dav/calendars/alice/{}/", portal.alice_calendar.id);

    for (uid, summary) in [("ev1", "One"), ("ev2", "Two")] {
        let response = send(
            &portal.app,
            Req::new("PUT", &format!("{cal_path}{uid}.ics"))
                .as_user("alice", ALICE_PASSWORD)
                .body(&ics_with_summary(summary)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let depth_zero = send(
        &portal.app,
        Req::new("PROPFIND", &cal_path)
            .as_user("alice", ALICE_PASSWORD)
            .depth("0"),
    )
    .await;
    assert_eq!(response_count(&body_text(depth_zero).await), 1);

    let depth_one = send(
        &portal.app,
        Req::new("PROPFIND", &cal_path)
            .as_user("alice", ALICE_PASSWORD)
            .depth("1"),
    )
    .await;
    let body = body_text(depth_one).await;
    assert_eq!(response_count(&body), 3);
    assert!(body.contains("ev1.ics"));
    assert!(body.contains("ev2.ics"));
    // Shallow enumeration carries validators, not payloads
    assert!(body.contains("<D:getetag>"));
    assert!(!body.contains("<C:calendar-data>"));
}

#[tokio::test]
async fn propfind_unknown_route_is_404() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/junk/stuff").as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn propfind_outside_mount_is_404() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/api/mail").as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn propfind_malformed_body_is_400() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/")
            .as_user("alice", ALICE_PASSWORD)
            .body("<D:propfind xmlns:D=\"DAV:\"><D:prop>"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ── PUT / GET round trip ──

#[tokio::test]
async fn put_then_get_event_round_trips() {
    let portal = setup();
    let event_path = format!(
        "/dav/calendars/alice/{}/ev1.ics",
        portal.alice_calendar.id
    );

    let put = send(
        &portal.app,
        Req::new("PUT", &event_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&standup_ics()),
    )
    .await;
    assert_eq!(put.status(), StatusCode::CREATED);
    let put_etag = header_value(&put, "etag").expect("ETag on PUT");
    let location = header_value(&put, "location").expect("Location on PUT");
    assert!(location.ends_with("ev1.ics"));

    let get = send(
        &portal.app,
        Req::new("GET", &event_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(
        header_value(&get, "content-type").as_deref(),
        Some("text/calendar; charset=utf-8")
    );
    assert_eq!(header_value(&get, "etag"), Some(put_etag));

    let body = body_text(get).await;
    assert!(body.contains("SUMMARY:Standup"));
    assert!(body.contains("DTSTART:20240105T090000Z"));
    assert!(body.contains("DTEND:20240105T093000Z"));
    assert!(body.contains("STATUS:CONFIRMED"));
    assert!(body.contains("UID:ev1"));
}

#[tokio::test]
async fn etag_moves_with_every_update() {
    let portal = setup();
    let event_path = format!(
        "/dav/calendars/alice/{}/ev1.ics",
        portal.alice_calendar.id
    );

    let first = send(
        &portal.app,
        Req::new("PUT", &event_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&standup_ics()),
    )
    .await;
    let first_etag = header_value(&first, "etag").unwrap();

    let second = send(
        &portal.app,
        Req::new("PUT", &event_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&ics_with_summary("Standup (moved)")),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_etag = header_value(&second, "etag").unwrap();
    assert_ne!(first_etag, second_etag);

    let get = send(
        &portal.app,
        Req::new("GET", &event_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(header_value(&get, "etag"), Some(second_etag));
    assert!(body_text(get).await.contains("SUMMARY:Standup (moved)"));
}

#[tokio::test]
async fn ctag_reacts_to_child_writes_and_is_stable_across_reads() {
    let portal = setup();
    let cal_path = format!("/dav/calendars/alice/{}/", portal.alice_calendar.id);

    let empty_ctag = probe_ctag(&portal.app, &cal_path).await;
    assert_eq!(empty_ctag, "empty");
    assert_eq!(probe_ctag(&portal.app, &cal_path).await, empty_ctag);

    send(
        &portal.app,
        Req::new("PUT", &format!("{cal_path}ev1.ics"))
            .as_user("alice", ALICE_PASSWORD)
            .body(&standup_ics()),
    )
    .await;

    let after_create = probe_ctag(&portal.app, &cal_path).await;
    assert_ne!(after_create, empty_ctag);
    assert_eq!(probe_ctag(&portal.app, &cal_path).await, after_create);

    send(
        &portal.app,
        Req::new("DELETE", &format!("{cal_path}ev1.ics")).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(probe_ctag(&portal.app, &cal_path).await, "empty");
}

#[tokio::test]
async fn put_invalid_payload_is_400() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new(
            "PUT",
            &format!("/dav/calendars/alice/{}/ev1.ics", portal.alice_calendar.id),
        )
        .as_user("alice", ALICE_PASSWORD)
        .body("this is not icalendar"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &portal.app,
        Req::new(
            "PUT",
            &format!("/dav/addressbooks/alice/{}/c1.vcf", portal.alice_book_id),
        )
        .as_user("alice", ALICE_PASSWORD)
        .body("this is not a vcard"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_into_foreign_collection_is_403() {
    let portal = setup();
    // Path username says alice, but the collection id belongs to bob
    let response = send(
        &portal.app,
        Req::new(
            "PUT",
            &format!("/dav/calendars/alice/{}/ev1.ics", portal.bob_calendar_id),
        )
        .as_user("alice", ALICE_PASSWORD)
        .body(&standup_ics()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ── DELETE ──

#[tokio::test]
async fn delete_event_then_get_is_404() {
    let portal = setup();
    let event_path = format!(
        "/dav/calendars/alice/{}/ev1.ics",
        portal.alice_calendar.id
    );
    send(
        &portal.app,
        Req::new("PUT", &event_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&standup_ics()),
    )
    .await;

    let delete = send(
        &portal.app,
        Req::new("DELETE", &event_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let get = send(
        &portal.app,
        Req::new("GET", &event_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let delete_again = send(
        &portal.app,
        Req::new("DELETE", &event_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(delete_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_as_other_user_is_403() {
    let portal = setup();
    let event_path = format!(
        "/dav/calendars/alice/{}/ev1.ics",
        portal.alice_calendar.id
    );
    send(
        &portal.app,
        Req::new("PUT", &event_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&standup_ics()),
    )
    .await;

    let response = send(
        &portal.app,
        Req::new("DELETE", &event_path).as_user("bob", BOB_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn foreign_event_under_own_username_is_hidden() {
    let portal = setup();
    // Bob creates an event in his calendar
    send(
        &portal.app,
        Req::new(
            "PUT",
            &format!("/dav/calendars/bob/{}/bobev.ics", portal.bob_calendar_id),
        )
        .as_user("bob", BOB_PASSWORD)
        .body(&standup_ics()),
    )
    .await;

    // Alice addresses bob's event id under her own username: the ownership
    // chain fails softly with 404, not 403
    let response = send(
        &portal.app,
        Req::new(
            "GET",
            &format!("/dav/calendars/alice/{}/bobev.ics", portal.alice_calendar.id),
        )
        .as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── REPORT ──

#[tokio::test]
async fn calendar_multiget_scopes_to_owned_resources() {
    let portal = setup();
    let cal_path = format!("/dav/calendars/alice/{}/", portal.alice_calendar.id);

    for (uid, summary) in [("ev1", "One"), ("ev2", "Two")] {
        send(
            &portal.app,
            Req::new("PUT", &format!("{cal_path}{uid}.ics"))
                .as_user("alice", ALICE_PASSWORD)
                .body(&ics_with_summary(summary)),
        )
        .await;
    }
    send(
        &portal.app,
        Req::new(
            "PUT",
            &format!("/dav/calendars/bob/{}/bobev.ics", portal.bob_calendar_id),
        )
        .as_user("bob", BOB_PASSWORD)
        .body(&ics_with_summary("Bob's")),
    )
    .await;

    // Three hrefs, one of them bob's: exactly two responses survive
    let report_body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-multiget xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><D:getetag/><C:calendar-data/></D:prop>
  <D:href>{cal_path}ev1.ics</D:href>
  <D:href>{cal_path}ev2.ics</D:href>
  <D:href>/dav/calendars/bob/{}/bobev.ics</D:href>
</C:calendar-multiget>"#,
        portal.bob_calendar_id
    );

    let response = send(
        &portal.app,
        Req::new("REPORT", &cal_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&report_body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body = body_text(response).await;
    assert_eq!(response_count(&body), 2);
    assert!(body.contains("<C:calendar-data>"));
    assert!(body.contains("SUMMARY:One"));
    assert!(body.contains("SUMMARY:Two"));
    assert!(!body.contains("SUMMARY:Bob's"));
}

#[tokio::test]
async fn calendar_query_returns_full_collection_ignoring_filters() {
    let portal = setup();
    let cal_path = format!("/dav/calendars/alice/{}/", portal.alice_calendar.id);

    for (uid, summary) in [("ev1", "One"), ("ev2", "Two")] {
        send(
            &portal.app,
            Req::new("PUT", &format!("{cal_path}{uid}.ics"))
                .as_user("alice", ALICE_PASSWORD)
                .body(&ics_with_summary(summary)),
        )
        .await;
    }

    // Time-range filter excludes everything, but filters are not evaluated
    let report_body = r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><D:getetag/><C:calendar-data/></D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="19700101T000000Z" end="19700102T000000Z"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

    let response = send(
        &portal.app,
        Req::new("REPORT", &cal_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(report_body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    assert_eq!(response_count(&body_text(response).await), 2);
}

#[tokio::test]
async fn unsupported_report_is_403() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new(
            "REPORT",
            &format!("/dav/calendars/alice/{}/", portal.alice_calendar.id),
        )
        .as_user("alice", ALICE_PASSWORD)
        .body(r#"<D:sync-collection xmlns:D="DAV:"></D:sync-collection>"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn report_malformed_body_is_400() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new(
            "REPORT",
            &format!("/dav/calendars/alice/{}/", portal.alice_calendar.id),
        )
        .as_user("alice", ALICE_PASSWORD)
        .body("<C:calendar-multiget"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ── Contacts ──

#[tokio::test]
async fn put_then_get_contact_defaults_email_type_to_home() {
    let portal = setup();
    let contact_path = format!("/dav/addressbooks/alice/{}/c1.vcf", portal.alice_book_id);

    let vcard = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:c1\r\nFN:Jane Doe\r\n\
                 N:Doe;Jane;;;\r\nEMAIL:jane@example.com\r\nEND:VCARD\r\n";
    let put = send(
        &portal.app,
        Req::new("PUT", &contact_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(vcard),
    )
    .await;
    assert_eq!(put.status(), StatusCode::CREATED);
    assert!(header_value(&put, "location").unwrap().ends_with("c1.vcf"));

    let get = send(
        &portal.app,
        Req::new("GET", &contact_path).as_user("alice", ALICE_PASSWORD),
    )
    .await;
    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(
        header_value(&get, "content-type").as_deref(),
        Some("text/vcard; charset=utf-8")
    );

    let body = body_text(get).await;
    assert!(body.contains("FN:Jane Doe"));
    assert!(body.contains("N:Doe;Jane;;;"));
    assert!(body.contains("EMAIL;TYPE=HOME:jane@example.com"));
}

#[tokio::test]
async fn addressbook_multiget_returns_address_data() {
    let portal = setup();
    let book_path = format!("/dav/addressbooks/alice/{}/", portal.alice_book_id);

    let vcard = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:c1\r\nFN:Jane Doe\r\nEND:VCARD\r\n";
    send(
        &portal.app,
        Req::new("PUT", &format!("{book_path}c1.vcf"))
            .as_user("alice", ALICE_PASSWORD)
            .body(vcard),
    )
    .await;

    let report_body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<CR:addressbook-multiget xmlns:D="DAV:" xmlns:CR="urn:ietf:params:xml:ns:carddav">
  <D:prop><D:getetag/><CR:address-data/></D:prop>
  <D:href>{book_path}c1.vcf</D:href>
  <D:href>{book_path}missing.vcf</D:href>
</CR:addressbook-multiget>"#
    );

    let response = send(
        &portal.app,
        Req::new("REPORT", &book_path)
            .as_user("alice", ALICE_PASSWORD)
            .body(&report_body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body = body_text(response).await;
    assert_eq!(response_count(&body), 1);
    assert!(body.contains("<CR:address-data>"));
    assert!(body.contains("FN:Jane Doe"));
}

#[tokio::test]
async fn propfind_addressbook_home_lists_books() {
    let portal = setup();
    let response = send(
        &portal.app,
        Req::new("PROPFIND", "/dav/addressbooks/alice/")
            .as_user("alice", ALICE_PASSWORD)
            .depth("1"),
    )
    .await;

    let body = body_text(response).await;
    assert_eq!(response_count(&body), 2);
    assert!(body.contains("<CR:addressbook/>"));
    assert!(body.contains("<CR:addressbook-multiget/>"));
}

// Sanity: the seeded rows carry the expected ownership
#[tokio::test]
async fn seeded_fixture_is_coherent() {
    let portal = setup();
    assert_eq!(portal.alice.username, "alice");
    assert_eq!(portal.alice_calendar.user_id, portal.alice.id);
}
