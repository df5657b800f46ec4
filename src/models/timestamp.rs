//! Defensive timestamp handling for backend-supplied `CreatedAt` strings.
//!
//! The backend occasionally emits timestamps with oversized fractional
//! seconds or a missing timezone. Those must never become errors: the
//! parser tries progressively looser formats and, as a last resort,
//! substitutes the current instant (logged, not surfaced).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse an RFC 3339-ish timestamp, tolerating fractional-second and
/// timezone artifacts. Returns `None` only when nothing usable remains.
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // No timezone designator at all, or a space instead of 'T'.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    None
}

/// Parse with the "now" fallback required by the notification store.
pub fn parse_or_now(raw: &str) -> DateTime<Utc> {
    parse_flexible(raw).unwrap_or_else(|| {
        if !raw.trim().is_empty() {
            tracing::warn!(raw, "unparseable CreatedAt timestamp, substituting now");
        }
        Utc::now()
    })
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(parse_or_now(&raw))
}
