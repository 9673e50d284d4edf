//! Callback timestamps
//!
//! The platform sends epoch milliseconds; older payloads and some tooling
//! send epoch seconds. Both are accepted, as integers or numeric strings.

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Values at or above this magnitude are read as milliseconds. In seconds it
/// would be a date in the year 5138.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

/// Instant used when a callback carries no timestamp
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Convert an epoch value in seconds or milliseconds to a point in time.
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.unsigned_abs() >= MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Integer(v) => v,
        // `as` saturates, so out-of-range floats are rejected up front
        RawTimestamp::Float(v) if v.is_finite() && v.abs() < i64::MAX as f64 => v.trunc() as i64,
        RawTimestamp::Float(v) => {
            return Err(de::Error::custom(format!("invalid timestamp: {}", v)));
        }
        RawTimestamp::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid timestamp: {:?}", s)))?,
    };

    from_epoch(value).ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", value)))
}
