//! Timestamp text convention shared by every record.
//!
//! Timestamps are written as `YYYY-MM-DDTHH:MM:SS+00:00`, with a six digit
//! microsecond fraction only when it is non-zero. The offset is always spelled
//! `+00:00`, never `Z`. Parsing accepts any RFC 3339 timestamp whose offset is
//! zero and rejects everything else.

use chrono::{DateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::FsrsError;

pub fn format(dt: &DateTime<Utc>) -> String {
    if dt.timestamp_subsec_micros() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
    }
}

pub fn parse(text: &str) -> Result<DateTime<Utc>, FsrsError> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .map_err(|e| FsrsError::InvalidTimestamp(format!("{text}: {e}")))?;
    ensure_utc(parsed)
}

/// Converts a zoned datetime into UTC, failing unless its offset is zero.
pub fn ensure_utc<Tz: TimeZone>(dt: DateTime<Tz>) -> Result<DateTime<Utc>, FsrsError> {
    if dt.offset().fix().local_minus_utc() != 0 {
        return Err(FsrsError::NonUtcDatetime(dt.fixed_offset().to_rfc3339()));
    }
    Ok(dt.with_timezone(&Utc))
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(serde::de::Error::custom)
}

pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| super::parse(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
