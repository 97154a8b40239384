use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp formats used by the NVD feed files, most common first.
const FORMATS: &[&str] = &["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.3fZ"];

#[derive(Debug, thiserror::Error)]
#[error("unparseable feed timestamp: {value}")]
pub struct TimestampError {
    pub value: String,
}

/// Parse a feed timestamp such as `2019-04-29T15:29Z`.
pub fn parse_feed_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    Err(TimestampError {
        value: value.to_string(),
    })
}
