//! WebDAV XML layer
//!
//! Response trees are built from a small namespace-aware element builder and
//! serialized with an XML declaration up front; request bodies (PROPFIND,
//! REPORT) are parsed with a streaming `quick_xml` reader. Element names are
//! always produced through the namespace constants below, never assembled
//! ad hoc at call sites.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::QName;
use thiserror::Error;

/// `DAV:` namespace, prefix `D`
pub const DAV_NS: &str = "DAV:";
/// CalDAV namespace, prefix `C`
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";
/// CardDAV namespace, prefix `CR`
pub const CARDDAV_NS: &str = "urn:ietf:params:xml:ns:carddav";
/// CalendarServer extensions (ctag), prefix `CS`
pub const CALENDARSERVER_NS: &str = "http://calendarserver.org/ns/";
/// Apple iCal extensions (calendar-color), prefix `A`
pub const APPLE_ICAL_NS: &str = "http://apple.com/ns/ical/";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Qualified name in the `DAV:` namespace
#[must_use]
pub fn dav(tag: &str) -> String {
    format!("D:{tag}")
}

/// Qualified name in the CalDAV namespace
#[must_use]
pub fn caldav(tag: &str) -> String {
    format!("C:{tag}")
}

/// Qualified name in the CardDAV namespace
#[must_use]
pub fn carddav(tag: &str) -> String {
    format!("CR:{tag}")
}

/// Qualified name in the CalendarServer namespace
#[must_use]
pub fn calendarserver(tag: &str) -> String {
    format!("CS:{tag}")
}

/// Qualified name in the Apple iCal namespace
#[must_use]
pub fn apple_ical(tag: &str) -> String {
    format!("A:{tag}")
}

/// Errors from request-body parsing
#[derive(Debug, Error)]
pub enum XmlError {
    /// Body is not well-formed XML (or not UTF-8)
    #[error("Malformed XML body: {0}")]
    Malformed(String),
}

/// An XML element under construction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an element holding only text
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Add a child element, builder style
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element in place
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Render the element; text and attribute values are escaped
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(256);
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text.as_str()));
        }
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A 207 Multi-Status response under construction
#[derive(Debug, Default)]
pub struct Multistatus {
    responses: Vec<XmlElement>,
}

impl Multistatus {
    /// Create an empty multistatus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `response` elements collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether no responses were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Add a response with a `200 OK` propstat
    pub fn add_response(&mut self, href: &str, prop: XmlElement) {
        self.add_response_with_status(href, prop, "HTTP/1.1 200 OK");
    }

    /// Add a response with an explicit propstat status line
    pub fn add_response_with_status(&mut self, href: &str, prop: XmlElement, status: &str) {
        let response = XmlElement::new(dav("response"))
            .child(XmlElement::with_text(dav("href"), href))
            .child(
                XmlElement::new(dav("propstat"))
                    .child(prop)
                    .child(XmlElement::with_text(dav("status"), status)),
            );
        self.responses.push(response);
    }

    /// Serialize to the final XML document
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut root = XmlElement::new(dav("multistatus"))
            .attr("xmlns:D", DAV_NS)
            .attr("xmlns:C", CALDAV_NS)
            .attr("xmlns:CR", CARDDAV_NS)
            .attr("xmlns:CS", CALENDARSERVER_NS)
            .attr("xmlns:A", APPLE_ICAL_NS);
        for response in &self.responses {
            root.push(response.clone());
        }
        format!("{XML_DECLARATION}{}", root.render())
    }
}

/// Parsed PROPFIND request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropfindRequest {
    /// Requested property local names; `None` means allprop (or empty body)
    pub props: Option<Vec<String>>,
}

/// Parsed REPORT request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Local name of the root element (`calendar-multiget`, ...)
    pub name: String,
    /// Requested property local names; accepted but not evaluated
    pub props: Vec<String>,
    /// hrefs listed by multiget reports
    pub hrefs: Vec<String>,
}

fn local_name_of(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).into_owned()
}

/// Parse a PROPFIND body
///
/// An empty body is valid and means allprop; anything non-empty must be
/// well-formed XML.
pub fn parse_propfind(body: &[u8]) -> Result<PropfindRequest, XmlError> {
    let text =
        std::str::from_utf8(body).map_err(|e| XmlError::Malformed(format!("not UTF-8: {e}")))?;
    if text.trim().is_empty() {
        return Ok(PropfindRequest { props: None });
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut props = Vec::new();
    let mut allprop = false;
    let mut in_prop = false;
    let mut depth = 0_usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let local = local_name_of(e.name());
                if in_prop {
                    props.push(local);
                } else if local == "prop" {
                    in_prop = true;
                } else if local == "allprop" {
                    allprop = true;
                }
            },
            Ok(Event::Empty(e)) => {
                let local = local_name_of(e.name());
                if in_prop {
                    props.push(local);
                } else if local == "allprop" {
                    allprop = true;
                }
            },
            Ok(Event::End(e)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                if local_name_of(e.name()) == "prop" {
                    in_prop = false;
                }
            },
            Ok(Event::Eof) => {
                if depth != 0 {
                    return Err(XmlError::Malformed("unexpected end of body".to_string()));
                }
                break;
            },
            Err(e) => return Err(XmlError::Malformed(e.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }

    let props = if allprop || props.is_empty() {
        None
    } else {
        Some(props)
    };
    Ok(PropfindRequest { props })
}

/// Parse a REPORT body
///
/// The root element names the report; `href` children are collected for the
/// multiget variants. Filter elements in query reports are consumed without
/// being evaluated.
pub fn parse_report(body: &[u8]) -> Result<ReportRequest, XmlError> {
    let text =
        std::str::from_utf8(body).map_err(|e| XmlError::Malformed(format!("not UTF-8: {e}")))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut name: Option<String> = None;
    let mut props = Vec::new();
    let mut hrefs = Vec::new();
    let mut in_prop = false;
    let mut in_href = false;
    let mut current_href = String::new();
    let mut depth = 0_usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let local = local_name_of(e.name());
                if name.is_none() {
                    name = Some(local);
                } else if local == "prop" {
                    in_prop = true;
                } else if local == "href" {
                    in_href = true;
                    current_href.clear();
                } else if in_prop {
                    props.push(local);
                }
            },
            Ok(Event::Empty(e)) => {
                let local = local_name_of(e.name());
                if name.is_none() {
                    name = Some(local);
                } else if in_prop {
                    props.push(local);
                }
            },
            Ok(Event::Text(e)) => {
                if in_href {
                    match e.unescape() {
                        Ok(text) => current_href.push_str(&text),
                        Err(e) => return Err(XmlError::Malformed(e.to_string())),
                    }
                }
            },
            Ok(Event::End(e)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                let local = local_name_of(e.name());
                if local == "href" {
                    in_href = false;
                    if !current_href.is_empty() {
                        hrefs.push(current_href.clone());
                    }
                } else if local == "prop" {
                    in_prop = false;
                }
            },
            Ok(Event::Eof) => {
                if depth != 0 {
                    return Err(XmlError::Malformed("unexpected end of body".to_string()));
                }
                break;
            },
            Err(e) => return Err(XmlError::Malformed(e.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }

    let name = name.ok_or_else(|| XmlError::Malformed("empty REPORT body".to_string()))?;
    Ok(ReportRequest { name, props, hrefs })
}
