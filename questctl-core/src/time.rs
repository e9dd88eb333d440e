//! Conversion between the remote service's epoch-millisecond timestamps
//! and chrono wall-clock types, plus elapsed-time rendering for reports.

use chrono::{DateTime, Local, Utc};

use crate::error::{QuestError, Result};

/// Convert an epoch-millisecond timestamp to UTC wall-clock time.
pub fn from_epoch_ms(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| QuestError::invalid_timestamp(ms, "out of chrono range"))
}

/// Convert an epoch-millisecond timestamp to local wall-clock time.
pub fn to_local(ms: i64) -> Result<DateTime<Local>> {
    Ok(from_epoch_ms(ms)?.with_timezone(&Local))
}

/// Convert a wall-clock time back to the remote service's representation.
pub fn to_epoch_ms<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis()
}

/// Current time in the remote service's representation.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a millisecond duration as days/hours/minutes, e.g.
/// "2 days, 3 hours, 14 minutes". Zero leading units are skipped;
/// minutes are always present.
pub fn format_elapsed(ms: i64) -> String {
    let total_minutes = ms.max(0) / 60_000;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 || days > 0 {
        parts.push(plural(hours, "hour"));
    }
    parts.push(plural(minutes, "minute"));
    parts.join(", ")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
