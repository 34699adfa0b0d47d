//! Typed records decoded from `vm/qeval` responses.
//!
//! Each decoder locates the `data:` payload, finds the `struct{` marker,
//! splits the body into top-level fields, checks the arity and maps the
//! fields by position. Arity and bracket problems are fatal; a single field
//! that cannot be read just decodes to `None`.

use crate::core::error::GooError;
use crate::qeval::extract::{self, TimeRef};
use crate::qeval::grammar::{self, QValue};
use crate::qeval::{collection, fields};
use std::fmt;
use tracing::debug;

pub const DATA_REQUEST_FIELDS: usize = 14;
pub const DISPUTE_FIELDS: usize = 8;
pub const RECORD_MARKER: &str = "struct{";

const DATA_PREFIX: &str = "data:";

/// Everything after the `data:` prefix, or the whole text if there is none.
pub fn payload(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with(DATA_PREFIX) {
            return text[offset + indent + DATA_PREFIX.len()..].trim();
        }
        offset += line.len();
    }
    text.trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Requested,
    Proposed,
    Disputed,
    Resolved,
    Unknown,
}

impl RequestState {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Requested" => RequestState::Requested,
            "Proposed" => RequestState::Proposed,
            "Disputed" => RequestState::Disputed,
            "Resolved" => RequestState::Resolved,
            _ => RequestState::Unknown,
        }
    }

    pub fn from_index(index: i64) -> Self {
        match index {
            0 => RequestState::Requested,
            1 => RequestState::Proposed,
            2 => RequestState::Disputed,
            3 => RequestState::Resolved,
            _ => RequestState::Unknown,
        }
    }

    /// Quoted name, bare identifier, or numeric discriminant.
    pub fn from_field(field: &str) -> Self {
        match grammar::parse(field.trim()) {
            Ok(value) => match value.inner() {
                QValue::Str(name) | QValue::Ident(name) => Self::from_name(name),
                QValue::Int(i) => Self::from_index(*i),
                _ => RequestState::Unknown,
            },
            Err(_) => extract::string(field)
                .map(|name| Self::from_name(&name))
                .unwrap_or(RequestState::Unknown),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Requested => "Requested",
            RequestState::Proposed => "Proposed",
            RequestState::Disputed => "Disputed",
            RequestState::Resolved => "Resolved",
            RequestState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataRequestRecord {
    pub id: Option<String>,
    pub creator: Option<String>,
    pub created_at: Option<TimeRef>,
    pub question: Option<String>,
    pub is_yes_no: Option<bool>,
    pub proposed_value: Option<i64>,
    pub proposer: Option<String>,
    pub proposer_bond: Option<i64>,
    pub disputer: Option<String>,
    pub disputer_bond: Option<i64>,
    pub resolution_time: Option<TimeRef>,
    pub winning_value: Option<i64>,
    pub state: RequestState,
    pub deadline: Option<TimeRef>,
}

impl DataRequestRecord {
    pub fn has_proposer(&self) -> bool {
        self.proposer.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_disputer(&self) -> bool {
        self.disputer.as_deref().is_some_and(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisputeRecord {
    pub request_id: Option<String>,
    /// Items in the vote list; the votes themselves are not decoded.
    pub vote_count: Option<usize>,
    pub resolved_vote_count: Option<i64>,
    pub is_resolved: Option<bool>,
    pub winning_value: Option<i64>,
    pub end_time: Option<TimeRef>,
    pub end_reveal_time: Option<TimeRef>,
}

impl DisputeRecord {
    /// Votes committed but not yet revealed, when both counts are known.
    pub fn unrevealed(&self) -> Option<i64> {
        let total = i64::try_from(self.vote_count?).ok()?;
        Some(total - self.resolved_vote_count?)
    }
}

fn record_fields<'a>(
    text: &'a str,
    kind: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, GooError> {
    let body = fields::record_body(payload(text), RECORD_MARKER)?;
    let parts = fields::split_fields(body)?;
    if parts.len() != expected {
        debug!(kind, expected, found = parts.len(), "record arity mismatch");
        return Err(GooError::FieldCountMismatch {
            kind,
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

pub fn decode_data_request(text: &str) -> Result<DataRequestRecord, GooError> {
    let f = record_fields(text, "data request", DATA_REQUEST_FIELDS)?;
    Ok(DataRequestRecord {
        id: extract::string(f[0]),
        creator: extract::address(f[1]),
        created_at: extract::time(f[2]),
        question: extract::string(f[3]),
        is_yes_no: extract::boolean(f[4]),
        proposed_value: extract::int64(f[5]),
        proposer: extract::address(f[6]),
        proposer_bond: extract::int64(f[7]),
        disputer: extract::address(f[8]),
        disputer_bond: extract::int64(f[9]),
        resolution_time: extract::time(f[10]),
        winning_value: extract::int64(f[11]),
        state: RequestState::from_field(f[12]),
        deadline: extract::time(f[13]),
    })
}

/// Field 2 (the voter index) is skipped.
pub fn decode_dispute(text: &str) -> Result<DisputeRecord, GooError> {
    let f = record_fields(text, "dispute", DISPUTE_FIELDS)?;
    let vote_count = match collection::list_count(f[1]) {
        Ok(n) => Some(n),
        Err(e) => {
            debug!(error = %e, "undecodable vote list");
            None
        }
    };
    Ok(DisputeRecord {
        request_id: extract::string(f[0]),
        vote_count,
        resolved_vote_count: extract::int64(f[3]),
        is_resolved: extract::boolean(f[4]),
        winning_value: extract::int64(f[5]),
        end_time: extract::time(f[6]),
        end_reveal_time: extract::time(f[7]),
    })
}

/// Single `int64` getter response such as `data: (2000000 int64)`.
pub fn decode_int64(text: &str) -> Result<i64, GooError> {
    let data = payload(text);
    extract::int64(data).ok_or_else(|| {
        GooError::RecordNotFound(format!("no int64 value in response '{}'", data.trim()))
    })
}

/// List of request ids such as `data: (slice[("0000001" string),...] []string)`.
pub fn decode_request_ids(text: &str) -> Result<Vec<String>, GooError> {
    let data = payload(text);
    collection::list_items(data)?
        .into_iter()
        .map(|item| {
            extract::string(item).ok_or_else(|| {
                GooError::MalformedRecord(format!("request id is not a string: '{}'", item))
            })
        })
        .collect()
}
