// Fuzzy timestamp formatting. The clock is injected; nothing here reads time.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use wasm_bindgen::prelude::*;

use crate::error::WidgetError;

/// Cadence at which the environment re-renders visible fuzzy timestamps.
pub const REFRESH_MILLIS: u32 = 60_000;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a server timestamp: RFC 3339, or the site's bare
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` forms read as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, WidgetError> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(WidgetError::Timestamp(text.to_string()))
}

/// Format how long ago `then` was, relative to `now`.
///
/// Up to a rounded-down day the label stays clock-like ("5 mins ago",
/// "3 hours ago"); then "yesterday" and "2 days ago"; beyond that a
/// month-date within the last year and whole years after.
pub fn in_words(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().abs();
    let whole_minutes = seconds / 60;
    let whole_hours = seconds / 3600;
    let whole_days = seconds / 86_400;
    let whole_years = whole_days / 365;

    if whole_days > 2 {
        if whole_years == 0 {
            format!("{} {}", MONTHS[then.month0() as usize], then.day())
        } else {
            count_label(whole_years, "year", "years")
        }
    } else if whole_days == 2 {
        "2 days ago".to_string()
    } else if whole_days == 1 {
        "yesterday".to_string()
    } else if whole_minutes >= 60 {
        count_label(whole_hours, "hour", "hours")
    } else if seconds > 90 {
        count_label(whole_minutes, "min", "mins")
    } else {
        "just now".to_string()
    }
}

fn count_label(count: i64, singular: &str, plural: &str) -> String {
    let unit = if count == 1 { singular } else { plural };
    format!("{} {} ago", count, unit)
}

// ===== WASM Bindings =====

/// Format a server timestamp as fuzzy text.
///
/// # Arguments
/// * `datetime` - timestamp string from a `datetime` attribute
/// * `now_ms` - current time in epoch milliseconds (`Date.now()`)
///
/// # Errors
/// Returns a JS error when the timestamp cannot be parsed.
#[wasm_bindgen]
pub fn format_timeago(datetime: &str, now_ms: f64) -> Result<String, JsValue> {
    let then = parse_timestamp(datetime).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let now = DateTime::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| JsValue::from_str("now_ms out of range"))?;
    Ok(in_words(then, now))
}

/// Refresh cadence for rendered fuzzy timestamps, in milliseconds.
#[wasm_bindgen]
pub fn timeago_refresh_millis() -> u32 {
    REFRESH_MILLIS
}
