//! vCard 3.0 serialization / deserialization
//!
//! Line-oriented codec: unfold continuation lines, split each property on
//! the first `:`, pull the TYPE parameter out of the property name. Text
//! values are escaped per RFC 2426 (backslash, newline, comma, semicolon).

use domain::{Contact, ContactDraft, TypedValue};

use super::CodecError;

const PRODID: &str = "-//Haven//CardDAV//EN";
const REV_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// Encode a contact row as a vCard 3.0 document
#[must_use]
pub fn contact_to_vcard(contact: &Contact) -> String {
    let mut vcard = String::with_capacity(512);
    vcard.push_str("BEGIN:VCARD\r\n");
    vcard.push_str("VERSION:3.0\r\n");
    vcard.push_str(&format!("PRODID:{PRODID}\r\n"));
    vcard.push_str(&format!("UID:{}\r\n", escape_text(&contact.id)));

    // N (structured name): Family;Given;Middle;Prefix;Suffix
    let family = contact.surname.as_deref().unwrap_or("");
    let given = contact.given_name.as_deref().unwrap_or("");
    vcard.push_str(&format!(
        "N:{};{};;;\r\n",
        escape_text(family),
        escape_text(given)
    ));

    vcard.push_str(&format!("FN:{}\r\n", escape_text(&contact.full_name)));

    if let Some(org) = &contact.organization {
        vcard.push_str(&format!("ORG:{}\r\n", escape_text(org)));
    }

    for email in &contact.emails {
        vcard.push_str(&format!(
            "EMAIL;TYPE={}:{}\r\n",
            email.type_label.to_uppercase(),
            escape_text(&email.value)
        ));
    }
    for phone in &contact.phones {
        vcard.push_str(&format!(
            "TEL;TYPE={}:{}\r\n",
            phone.type_label.to_uppercase(),
            escape_text(&phone.value)
        ));
    }

    // ADR: PO box;Extended;Street;City;Region;Postal;Country — only the
    // street component is stored
    for address in &contact.addresses {
        vcard.push_str(&format!(
            "ADR;TYPE={}:;;{};;;;\r\n",
            address.type_label.to_uppercase(),
            escape_text(&address.value)
        ));
    }

    if let Some(notes) = &contact.notes {
        vcard.push_str(&format!("NOTE:{}\r\n", escape_text(notes)));
    }

    vcard.push_str(&format!(
        "REV:{}\r\n",
        contact.updated_at.format(REV_STAMP)
    ));
    vcard.push_str("END:VCARD\r\n");
    vcard
}

/// Decode a vCard into a contact draft
///
/// The UID inside the card is ignored, the resource id always comes from the
/// request path. Entries without a TYPE parameter default to `home`.
pub fn vcard_to_contact_draft(text: &str) -> Result<ContactDraft, CodecError> {
    let lines = unfold_lines(text);
    if !lines.iter().any(|l| l.trim() == "BEGIN:VCARD") {
        return Err(CodecError::InvalidVCard("missing BEGIN:VCARD".to_string()));
    }

    let mut draft = ContactDraft::default();
    let mut emails = Vec::new();
    let mut phones = Vec::new();
    let mut addresses = Vec::new();

    for line in &lines {
        let line = line.trim();
        if line.is_empty() || line == "BEGIN:VCARD" || line == "END:VCARD" {
            continue;
        }

        let Some((prop_with_params, value)) = line.split_once(':') else {
            continue;
        };
        let (prop_name, params) = match prop_with_params.split_once(';') {
            Some((name, params)) => (name.to_uppercase(), Some(params)),
            None => (prop_with_params.to_uppercase(), None),
        };

        match prop_name.as_str() {
            "FN" => draft.full_name = unescape_text(value),
            "N" => {
                // N:Family;Given;Middle;Prefix;Suffix
                let parts: Vec<&str> = value.split(';').collect();
                if let Some(family) = parts.first().filter(|s| !s.is_empty()) {
                    draft.surname = Some(unescape_text(family));
                }
                if let Some(given) = parts.get(1).filter(|s| !s.is_empty()) {
                    draft.given_name = Some(unescape_text(given));
                }
            },
            "ORG" => {
                // Organizational units collapse into one display string
                draft.organization = Some(unescape_text(value).replace(';', ", "));
            },
            "EMAIL" => emails.push(typed_value(params, value)),
            "TEL" => phones.push(typed_value(params, value)),
            "ADR" => {
                // Street lives in the third component
                let street = value.split(';').nth(2).unwrap_or("");
                addresses.push(TypedValue::new(
                    type_param(params),
                    unescape_text(street),
                ));
            },
            "NOTE" => draft.notes = Some(unescape_text(value)),
            _ => {},
        }
    }

    if !emails.is_empty() {
        draft.emails = Some(emails);
    }
    if !phones.is_empty() {
        draft.phones = Some(phones);
    }
    if !addresses.is_empty() {
        draft.addresses = Some(addresses);
    }

    Ok(draft)
}

fn typed_value(params: Option<&str>, value: &str) -> TypedValue {
    TypedValue::new(type_param(params), unescape_text(value))
}

/// Extract the TYPE parameter, defaulting to `home`
///
/// Accepts both `TYPE=WORK` and the bare `;WORK` form some producers emit.
fn type_param(params: Option<&str>) -> String {
    let Some(params) = params else {
        return "home".to_string();
    };
    for param in params.split(';') {
        let upper = param.trim().to_uppercase();
        if let Some(value) = upper.strip_prefix("TYPE=") {
            // Multi-valued TYPE=WORK,VOICE keeps the first label
            let first = value.split(',').next().unwrap_or(value);
            return first.to_lowercase();
        }
        if matches!(
            upper.as_str(),
            "HOME" | "WORK" | "CELL" | "FAX" | "PAGER" | "VOICE" | "PREF" | "INTERNET"
        ) {
            return upper.to_lowercase();
        }
    }
    "home".to_string()
}

/// Unfold continuation lines (RFC 2425 line folding)
fn unfold_lines(data: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in data.lines() {
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            if let Some(current) = lines.last_mut() {
                current.push_str(rest);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
