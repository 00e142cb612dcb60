// src/utils/time.rs

//! Timestamp parsing shared by the extractor and the state file.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Naive date-time layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the layouts news pages commonly use.
///
/// Tried in order: RFC 3339, offset date-time with a space separator,
/// naive ISO 8601 (as UTC), bare `YYYY-MM-DD` (midnight UTC), RFC 2822.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format an instant the way the state file stores it.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde adapter: writes RFC 3339, reads anything [`parse_timestamp`] accepts.
pub mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-03-15T19:40:00+11:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 15, 8, 40, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 8, 40, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-15T08:40:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-15 08:40:00").unwrap(), expected);
        assert!(parse_timestamp("2024-03-15T08:40:00.123456").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            parse_timestamp("2024-03-15").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        assert_eq!(
            parse_timestamp("Fri, 15 Mar 2024 08:40:00 +0000").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 40, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("2 hours ago").is_none());
    }

    #[test]
    fn test_format_round_trips() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(&now)), Some(now));
    }
}
