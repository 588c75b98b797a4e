//! Best-effort timestamp conversion for export fields

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Convert an epoch-seconds value (integer or fractional) to a UTC instant
///
/// Missing, zero, negative and non-numeric values are treated as absent.
pub(crate) fn from_epoch(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let secs = value?.as_f64()?;
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole, nanos)
}

/// Numeric creation time used to rank leaves; absent times rank as 0
pub(crate) fn epoch_rank(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|secs| secs.is_finite())
        .unwrap_or(0.0)
}

/// Parse an ISO-8601 string, accepting a trailing `Z` and offset-less forms
///
/// Malformed strings yield `None`.
pub(crate) fn from_iso8601(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Offset-less timestamps are taken as UTC
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
