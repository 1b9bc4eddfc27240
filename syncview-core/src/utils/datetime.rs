//! Datetime serialization/deserialization helpers.
//!
//! The daemon reports file timestamps as Unix seconds, often fractional.
//! - Serialization: `Option<DateTime<Utc>>` -> RFC3339 string or `null`
//! - Deserialization: RFC3339 string, integer or fractional Unix timestamp, or `null`

/// `Option<DateTime<Utc>>` serializer/deserializer helpers.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_fractional_timestamp, parse_unix_timestamp};

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from RFC3339, Unix timestamp, or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OptionalTimestamp {
            String(String),
            I64(i64),
            F64(f64),
        }

        match Option::<OptionalTimestamp>::deserialize(deserializer)? {
            Some(OptionalTimestamp::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
                .map(Some)
                .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
            Some(OptionalTimestamp::F64(ts)) => parse_fractional_timestamp(ts)
                .map(Some)
                .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
            None => Ok(None),
        }
    }
}

use chrono::{DateTime, Utc};

/// Parses an integer Unix timestamp in seconds.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Parses a fractional Unix timestamp in seconds, keeping sub-second precision.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_fractional_timestamp(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1_000_000_000.0).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}
