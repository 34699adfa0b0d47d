//! Per-field scalar extraction.
//!
//! Each extractor takes one raw field such as `("0000001" string)` and returns
//! `None` when the field cannot be read as the requested type, so a single odd
//! field never sinks a whole record. Grammar first, then a loose scan for
//! fields the grammar rejects.

use crate::qeval::grammar::{self, QValue};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static ADDRESS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|[\s("])(g1[^\s")]+)"#).expect("static regex"));
static BOOL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(true|false)\b").expect("static regex"));

const ZERO_ADDRESS_MARKERS: &[&str] = &["\"\"", "nil", "std.Address{}"];

/// An opaque time value. Never decoded into a concrete instant: the inline
/// form is the raw `{wall, ext, loc}` struct, shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRef {
    /// Back-reference to a time value shared elsewhere in the response.
    Shared(String),
    /// Inline value, kept verbatim.
    Inline(String),
}

impl TimeRef {
    pub fn is_shared(&self) -> bool {
        matches!(self, TimeRef::Shared(_))
    }
}

impl fmt::Display for TimeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRef::Shared(_) => write!(f, "N/A"),
            TimeRef::Inline(raw) => write!(f, "{}", raw),
        }
    }
}

/// First quoted segment's interior, escapes left as-is.
fn first_quoted(field: &str) -> Option<String> {
    let start = field.find('"')? + 1;
    let bytes = field.as_bytes();
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(field[start..i].to_string());
        }
    }
    None
}

pub fn string(field: &str) -> Option<String> {
    match grammar::parse(field.trim()) {
        Ok(value) => value.as_str().map(str::to_string),
        Err(_) => first_quoted(field),
    }
}

/// Address literal; `Some("")` for the zero address.
pub fn address(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = grammar::parse(trimmed) {
        return match value.inner() {
            QValue::Str(s) => Some(s.clone()),
            QValue::Ident(w) if w.starts_with("g1") => Some(w.clone()),
            QValue::Nil => Some(String::new()),
            _ => None,
        };
    }
    if let Some(quoted) = first_quoted(trimmed) {
        return Some(quoted);
    }
    if let Some(caps) = ADDRESS_TOKEN.captures(trimmed) {
        return Some(caps[1].to_string());
    }
    if ZERO_ADDRESS_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return Some(String::new());
    }
    None
}

/// Boolean literal. A quoted string is never a boolean, even `"true"`.
pub fn boolean(field: &str) -> Option<bool> {
    let trimmed = field.trim();
    if let Ok(value) = grammar::parse(trimmed) {
        return value.as_bool();
    }
    if trimmed.contains('"') {
        return None;
    }
    BOOL_WORD
        .captures(trimmed)
        .map(|caps| &caps[1] == "true")
}

pub fn int64(field: &str) -> Option<i64> {
    let trimmed = field.trim();
    if let Ok(value) = grammar::parse(trimmed) {
        return value.as_i64();
    }
    let digits: String = trimmed
        .trim_start_matches(|c: char| c == '(' || c.is_whitespace())
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

pub fn time(field: &str) -> Option<TimeRef> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = grammar::parse(trimmed) {
        if let QValue::Ref(target) = value.inner() {
            return Some(TimeRef::Shared(target.clone()));
        }
        return Some(TimeRef::Inline(trimmed.to_string()));
    }
    if trimmed.contains("ref(") {
        return Some(TimeRef::Shared(trimmed.to_string()));
    }
    Some(TimeRef::Inline(trimmed.to_string()))
}
