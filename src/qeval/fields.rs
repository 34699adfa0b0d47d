//! Bracket-aware field splitting.
//!
//! All scanning here works on bytes: every delimiter is ASCII, so slicing at
//! the positions found never lands inside a multi-byte character.

use crate::core::error::GooError;

fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}

fn is_closer(b: u8) -> bool {
    matches!(b, b')' | b']' | b'}')
}

fn malformed(msg: String) -> GooError {
    GooError::MalformedRecord(msg)
}

/// Split a record body at top-level commas.
///
/// Commas nested in any bracket kind or inside a quoted literal never split.
/// The result is lossless: `fields.join(",") == body`. An empty body has no
/// fields. Unbalanced or mismatched brackets and unterminated quotes are
/// `MalformedRecord`.
pub fn split_fields(body: &str) -> Result<Vec<&str>, GooError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = body.as_bytes();
    let mut fields = Vec::new();
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' => {
                if let Some(close) = closer_for(b) {
                    stack.push(close);
                }
            }
            b if is_closer(b) => match stack.pop() {
                Some(expected) if expected == b => {}
                Some(expected) => {
                    return Err(malformed(format!(
                        "expected '{}' but found '{}' at byte {}",
                        expected as char, b as char, i
                    )));
                }
                None => {
                    return Err(malformed(format!(
                        "unbalanced '{}' at byte {}",
                        b as char, i
                    )));
                }
            },
            b',' if stack.is_empty() => {
                fields.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_string {
        return Err(malformed("unterminated string literal".to_string()));
    }
    if !stack.is_empty() {
        return Err(malformed(format!("{} unclosed bracket(s)", stack.len())));
    }
    fields.push(&body[start..]);
    Ok(fields)
}

/// Byte index of the bracket closing the one at `open_idx`.
pub fn matching_close(text: &str, open_idx: usize) -> Result<usize, GooError> {
    let bytes = text.as_bytes();
    let Some(first) = bytes.get(open_idx).copied().and_then(closer_for) else {
        return Err(malformed(format!("no opening bracket at byte {}", open_idx)));
    };

    let mut stack = vec![first];
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open_idx + 1) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' => {
                if let Some(close) = closer_for(b) {
                    stack.push(close);
                }
            }
            b if is_closer(b) => {
                if stack.pop() != Some(b) {
                    return Err(malformed(format!(
                        "mismatched '{}' at byte {}",
                        b as char, i
                    )));
                }
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(malformed(format!(
        "bracket opened at byte {} is never closed",
        open_idx
    )))
}

/// First occurrence of `needle` that is not inside a quoted literal.
pub fn find_outside_quotes(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        if b == b'"' {
            in_string = true;
            continue;
        }
        if bytes[i..].starts_with(needle.as_bytes()) {
            return Some(i);
        }
    }
    None
}

/// Content between `marker` (which must end with an opening bracket) and its
/// matching closer.
pub fn record_body<'a>(text: &'a str, marker: &str) -> Result<&'a str, GooError> {
    let at = find_outside_quotes(text, marker)
        .ok_or_else(|| GooError::RecordNotFound(format!("no '{}' marker in response", marker)))?;
    let open_idx = at + marker.len() - 1;
    let close_idx = matching_close(text, open_idx)?;
    Ok(&text[open_idx + 1..close_idx])
}
