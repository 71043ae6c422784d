//! Lenient timestamp and date-bound parsing.
//!
//! The backend stores execution times as ISO-8601 strings without a reliable
//! offset. Parsing accepts the naive form, an RFC 3339 form (offset dropped,
//! keeping the local wall-clock reading), and a space-separated variant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a backend timestamp, accepting naive ISO-8601 or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    None
}

/// Parses a date bound such as `2024-01-01`.
///
/// A full timestamp is accepted and truncated to its date. Unparseable input
/// yields `None`, which callers treat as "no bound on that side".
pub fn parse_date_bound(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_timestamp(raw).map(|ts| ts.date())
}

/// First instant of a day: `00:00:00`.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last represented instant of a day: `23:59:59`.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).expect("valid end-of-day time")
}

/// Serde adapter for lenient timestamp fields.
pub mod flexible {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(de)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp: {raw}")))
    }
}

/// Serde adapter for optional lenient timestamp fields.
pub mod flexible_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        ts: &Option<NaiveDateTime>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => flexible::serialize(ts, ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_naive_timestamp() {
        let ts = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_timestamp_with_fraction_and_space() {
        assert!(parse_timestamp("2024-01-15T10:30:00.123").is_some());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        let ts = parse_timestamp("2025-10-27T15:00").unwrap();
        assert_eq!(ts.hour(), 15);
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let ts = parse_timestamp("2024-01-15T23:10:00+09:00").unwrap();
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(
            parse_date_bound("2024-01-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            parse_date_bound("2024-01-01T08:00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(parse_date_bound("not-a-date"), None);
        assert_eq!(parse_date_bound(""), None);
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(day_start(date).to_string(), "2024-06-01 00:00:00");
        assert_eq!(day_end(date).to_string(), "2024-06-01 23:59:59");
    }

    #[test]
    fn test_flexible_serde_roundtrip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "flexible")]
            at: NaiveDateTime,
        }

        let w: Wrapper = serde_json::from_str(r#"{"at":"2024-03-01T12:00:00"}"#).unwrap();
        assert_eq!(w.at.hour(), 12);
        let out = serde_json::to_string(&w).unwrap();
        assert_eq!(out, r#"{"at":"2024-03-01T12:00:00"}"#);
    }
}
