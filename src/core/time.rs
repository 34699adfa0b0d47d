//! Timestamp helpers shared by the command surfaces and the vote store.

use crate::core::error::GooError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// Current time as RFC 3339 with second precision (e.g. `2025-10-27T12:00:00Z`).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Nanoseconds since the unix epoch, `0` if the clock is before the epoch.
pub fn now_unix_nanos() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

pub fn parse_deadline(deadline: &str) -> Result<DateTime<Utc>, GooError> {
    DateTime::parse_from_rfc3339(deadline.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            GooError::ValidationError(format!(
                "invalid deadline format (expected RFC3339): {}",
                e
            ))
        })
}

/// Compact human duration: `45s`, `3m5s`, `2h10m`, `3d4h`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    if secs < 3600 {
        return format!("{}m{}s", secs / 60, secs % 60);
    }
    if secs < 86_400 {
        return format!("{}h{}m", secs / 3600, (secs / 60) % 60);
    }
    format!("{}d{}h", secs / 86_400, (secs / 3600) % 24)
}
