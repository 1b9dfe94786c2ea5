//! The cookie-jar wire format shared by every record store.
//!
//! Assignments look like `name=value;expires=Thu, 01 Jan 2026 00:00:00 GMT;path=/`
//! and reads produce `name=value; other=value2`. Names and values are
//! percent-escaped so that delimiters inside them cannot split a record.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::StoreError;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
}

pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Build the assignment string for one record. `name` and `value` are raw.
pub fn format_assignment(name: &str, value: &str, expires: DateTime<Utc>) -> String {
    format!(
        "{}={};expires={};path=/",
        escape_name(name),
        escape_value(value),
        format_http_date(expires)
    )
}

/// Parse an assignment as written by [`format_assignment`]. Name and value
/// stay escaped; stores keep them opaque.
pub fn parse_assignment(assignment: &str) -> Result<Assignment, StoreError> {
    let mut parts = assignment.split(';');
    let pair = parts.next().unwrap_or_default().trim();
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| StoreError::MalformedAssignment(assignment.to_string()))?;
    if name.is_empty() {
        return Err(StoreError::MalformedAssignment(assignment.to_string()));
    }

    let mut expires = None;
    for attribute in parts {
        let Some((key, val)) = attribute.trim().split_once('=') else {
            continue;
        };
        if key.eq_ignore_ascii_case("expires") {
            expires = Some(
                parse_http_date(val)
                    .ok_or_else(|| StoreError::MalformedAssignment(assignment.to_string()))?,
            );
        }
    }

    Ok(Assignment {
        name: name.to_string(),
        value: value.to_string(),
        expires,
    })
}

/// Find the value of `name` in a `;`-delimited record string.
pub fn lookup(cookie_string: &str, name: &str) -> Option<String> {
    let wanted = escape_name(name);
    cookie_string
        .split(';')
        .filter_map(|entry| entry.trim().split_once('='))
        .find(|(entry_name, _)| *entry_name == wanted)
        .map(|(_, value)| unescape(value))
}

fn needs_escape(c: char, in_name: bool) -> bool {
    matches!(c, '%' | ';' | ',') || (in_name && c == '=') || c.is_ascii_whitespace() || c.is_ascii_control()
}

fn escape(s: &str, in_name: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if needs_escape(c, in_name) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

pub fn escape_name(name: &str) -> String {
    escape(name, true)
}

pub fn escape_value(value: &str) -> String {
    escape(value, false)
}

pub fn unescape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
