//! List literals: `tag[item,item,...]`.

use crate::core::error::GooError;
use crate::qeval::fields;
use crate::qeval::grammar::{self, QValue};

/// Raw, trimmed item strings of the first list literal in `field`.
///
/// `tag[]` and a typed `nil` slice both yield an empty list.
pub fn list_items(field: &str) -> Result<Vec<&str>, GooError> {
    let trimmed = field.trim();
    if let Ok(value) = grammar::parse(trimmed) {
        if matches!(value.inner(), QValue::Nil) {
            return Ok(Vec::new());
        }
    }

    let open = fields::find_outside_quotes(trimmed, "[").ok_or_else(|| {
        GooError::MalformedRecord(format!("expected a list literal, got '{}'", trimmed))
    })?;
    let close = fields::matching_close(trimmed, open)?;
    let inner = &trimmed[open + 1..close];
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(fields::split_fields(inner)?
        .into_iter()
        .map(str::trim)
        .collect())
}

pub fn list_count(field: &str) -> Result<usize, GooError> {
    list_items(field).map(|items| items.len())
}
