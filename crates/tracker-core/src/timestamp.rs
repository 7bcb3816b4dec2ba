//! Millisecond-precision UTC timestamps.
//!
//! Stored and served as `YYYY-MM-DDTHH:MM:SS.mmmZ`, so a value read back from
//! the store compares equal to what a client received earlier.

use chrono::{DateTime, SubsecRound, Utc};

/// Wire format for timestamps.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Returns the current time truncated to milliseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Formats a timestamp in the wire format.
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Parses an RFC 3339 timestamp and normalises it to UTC milliseconds.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
}

/// `#[serde(with = "timestamp::iso_millis")]` adapter.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse(&s).map_err(serde::de::Error::custom)
    }
}
