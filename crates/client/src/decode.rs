//! Summary response decoding.
//!
//! Deployments disagree on the summary body: a bare array, or an object
//! wrapping the array under one of several field names, with per-bucket
//! field names that drifted over time. Decoding tries the known shapes in a
//! fixed priority order and fails loudly when none match, instead of
//! silently producing an empty chart.

use chrono::Timelike;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use domain::{coalesce_user, hour_label, HourBucket, UserBucket, HOURS_PER_DAY};

use crate::error::DecodeError;

/// Wrapper keys tried, in order, for the `by=user` summary.
pub const USER_BUCKET_KEYS: &[&str] = &["users", "user", "data", "content"];

/// Wrapper keys tried, in order, for the `by=hour` summary. `times` is the
/// field the backend's own summary DTO emits.
pub const HOUR_BUCKET_KEYS: &[&str] = &["hours", "hour", "times", "data", "content"];

const USER_ID_KEYS: &[&str] = &["userId", "user", "email"];
const HOUR_TOKEN_KEYS: &[&str] = &["hour", "hourLabel", "time", "bucket"];

lazy_static! {
    static ref HOUR_MINUTE_RE: Regex = Regex::new(r"^\d{2}:\d{2}").expect("valid hour regex");
    static ref TIMESTAMP_RE: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T").expect("valid timestamp regex");
}

/// Decodes a `by=user` summary body into user buckets.
///
/// Count precedence per bucket: `count`, then `total`, then
/// `success + failure`. Blank or missing user identifiers coalesce to the
/// `"(unknown)"` sentinel; no bucket is ever dropped for lacking one.
pub fn user_buckets(body: &Value) -> Result<Vec<UserBucket>, DecodeError> {
    let items = bucket_items(body, USER_BUCKET_KEYS)?;
    Ok(items
        .iter()
        .map(|item| UserBucket {
            user_id: coalesce_user(string_field(item, USER_ID_KEYS).as_deref()),
            count: user_count(item),
        })
        .collect())
}

/// Decodes a `by=hour` summary body into hour buckets, sorted ascending by
/// label. Tokens may be an `HH:MM` prefix, a full timestamp, or a bare hour
/// number; anything else is a decode error.
pub fn hour_buckets(body: &Value) -> Result<Vec<HourBucket>, DecodeError> {
    let items = bucket_items(body, HOUR_BUCKET_KEYS)?;
    let mut buckets = items
        .iter()
        .map(|item| {
            Ok(HourBucket {
                hour_label: hour_label(hour_of(item)?),
                count: numeric_field(item, "count")
                    .or_else(|| numeric_field(item, "total"))
                    .unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    buckets.sort_by(|a, b| a.hour_label.cmp(&b.hour_label));
    Ok(buckets)
}

/// Selects the bucket array: a bare array wins, then the wrapper keys in
/// priority order.
fn bucket_items<'a>(
    body: &'a Value,
    keys: &'static [&'static str],
) -> Result<&'a Vec<Value>, DecodeError> {
    if let Value::Array(items) = body {
        return Ok(items);
    }
    if let Value::Object(map) = body {
        for key in keys {
            if let Some(Value::Array(items)) = map.get(*key) {
                return Ok(items);
            }
        }
    }
    Err(DecodeError::UnrecognizedShape { expected: keys })
}

fn user_count(item: &Value) -> u64 {
    if let Some(count) = numeric_field(item, "count") {
        return count;
    }
    if let Some(total) = numeric_field(item, "total") {
        return total;
    }
    numeric_field(item, "success").unwrap_or(0) + numeric_field(item, "failure").unwrap_or(0)
}

fn hour_of(item: &Value) -> Result<u32, DecodeError> {
    let token = HOUR_TOKEN_KEYS.iter().find_map(|key| item.get(*key));
    let Some(token) = token else {
        return Err(DecodeError::BadHourToken("<missing>".to_string()));
    };

    match token {
        Value::Number(n) => n
            .as_u64()
            .map(|h| h as u32)
            .filter(|h| *h < HOURS_PER_DAY)
            .ok_or_else(|| DecodeError::BadHourToken(token.to_string())),
        Value::String(s) => {
            let s = s.trim();
            if HOUR_MINUTE_RE.is_match(s) {
                return s[..2]
                    .parse::<u32>()
                    .ok()
                    .filter(|h| *h < HOURS_PER_DAY)
                    .ok_or_else(|| DecodeError::BadHourToken(s.to_string()));
            }
            if TIMESTAMP_RE.is_match(s) {
                return shared::time::parse_timestamp(s)
                    .map(|ts| ts.hour())
                    .ok_or_else(|| DecodeError::BadHourToken(s.to_string()));
            }
            s.parse::<u32>()
                .ok()
                .filter(|h| *h < HOURS_PER_DAY)
                .ok_or_else(|| DecodeError::BadHourToken(s.to_string()))
        }
        other => Err(DecodeError::BadHourToken(other.to_string())),
    }
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn numeric_field(item: &Value, key: &str) -> Option<u64> {
    match item.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
