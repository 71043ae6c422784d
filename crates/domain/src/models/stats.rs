//! Usage statistics buckets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel label for rows with no usable user identifier.
pub const UNKNOWN_USER: &str = "(unknown)";

/// Hours in the histogram series.
pub const HOURS_PER_DAY: u32 = 24;

/// Aggregated query count for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBucket {
    pub user_id: String,
    pub count: u64,
}

/// Aggregated query count for one hour of the day, labeled `"HH:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour_label: String,
    pub count: u64,
}

/// Inclusive date bounds for a statistics query. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parses raw bounds leniently; an unparseable bound becomes open.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.and_then(shared::time::parse_date_bound),
            to: to.and_then(shared::time::parse_date_bound),
        }
    }

    /// The trailing seven days ending at `today`.
    pub fn last_week(today: NaiveDate) -> Self {
        Self {
            from: Some(today - chrono::Duration::days(7)),
            to: Some(today),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Coalesces a raw user identifier, mapping blank or missing values to the
/// `"(unknown)"` sentinel.
pub fn coalesce_user(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_USER.to_string(),
    }
}

/// Zero-padded `"HH:00"` label for an hour of the day.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}
