//! Usage statistics aggregation.
//!
//! Prefers the server's pre-aggregated summary and degrades to client-side
//! computation: when a dimension's summary is empty (or unusable), up to
//! [`FALLBACK_FETCH_CAP`] recent rows are fetched once and grouped locally.

use chrono::Timelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use domain::{
    coalesce_user, hour_label, DateRange, HourBucket, LogFilter, PageRequest, QueryLogRow,
    SortDir, UserBucket, HOURS_PER_DAY,
};

use crate::decode;
use crate::endpoints::SummaryDimension;
use crate::error::ClientError;
use crate::http::ApiClient;

/// Row cap for the client-side fallback fetch.
pub const FALLBACK_FETCH_CAP: u32 = 1000;

/// User buckets kept after descending sort.
pub const TOP_USER_LIMIT: usize = 10;

/// Derived usage views: top users and the 24-bucket hourly histogram.
///
/// `error` is a non-fatal indicator; the series are always renderable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageStats {
    pub by_user: Vec<UserBucket>,
    pub by_hour: Vec<HourBucket>,
    pub error: Option<String>,
}

impl UsageStats {
    /// Total queries across the retained user buckets.
    pub fn total(&self) -> u64 {
        self.by_user.iter().map(|b| b.count).sum()
    }

    pub fn top_user(&self) -> Option<&UserBucket> {
        self.by_user.first()
    }

    /// Busiest hour; the earliest wins a tie.
    pub fn peak_hour(&self) -> Option<&HourBucket> {
        self.by_hour
            .iter()
            .reduce(|best, b| if b.count > best.count { b } else { best })
    }
}

/// Builds [`UsageStats`] for a date range against the backend.
pub struct StatsAggregator {
    client: Arc<ApiClient>,
}

impl StatsAggregator {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Loads both dimensions.
    ///
    /// The two summary attempts are independent; a failure or unusable body
    /// on one does not block the other. Both summaries happen before the
    /// fallback decision, and the fallback fetch runs at most once even when
    /// both dimensions need it.
    pub async fn load(&self, range: DateRange) -> UsageStats {
        let (user_summary, hour_summary) =
            tokio::join!(self.user_summary(&range), self.hour_summary(&range));

        let mut by_user = user_summary.unwrap_or_else(|err| {
            warn!(error = %err, "user summary unavailable");
            Vec::new()
        });
        let mut by_hour = hour_summary.unwrap_or_else(|err| {
            warn!(error = %err, "hour summary unavailable");
            Vec::new()
        });

        let mut error = None;
        if by_user.is_empty() || by_hour.is_empty() {
            match self.fetch_recent_rows(&range).await {
                Ok(rows) => {
                    let empty_input = rows.is_empty();
                    if by_user.is_empty() {
                        by_user = aggregate_by_user(&rows);
                    }
                    if by_hour.is_empty() {
                        by_hour = aggregate_by_hour(&rows, &range);
                    }
                    if empty_input && by_user.is_empty() && by_hour.iter().all(|b| b.count == 0) {
                        error = Some("no usage data in the selected range".to_string());
                    }
                }
                Err(err) => {
                    warn!(error = %err, "fallback fetch failed");
                    error = Some(err.to_string());
                    if by_hour.is_empty() {
                        by_hour = empty_hour_series();
                    }
                }
            }
        }

        by_user.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.user_id.cmp(&b.user_id)));
        by_user.truncate(TOP_USER_LIMIT);

        UsageStats {
            by_user,
            by_hour: fill_hour_series(by_hour),
            error,
        }
    }

    async fn user_summary(&self, range: &DateRange) -> Result<Vec<UserBucket>, ClientError> {
        let body = self
            .client
            .fetch_log_summary(SummaryDimension::User, range)
            .await?;
        Ok(decode::user_buckets(&body)?)
    }

    async fn hour_summary(&self, range: &DateRange) -> Result<Vec<HourBucket>, ClientError> {
        let body = self
            .client
            .fetch_log_summary(SummaryDimension::Hour, range)
            .await?;
        Ok(decode::hour_buckets(&body)?)
    }

    async fn fetch_recent_rows(&self, range: &DateRange) -> Result<Vec<QueryLogRow>, ClientError> {
        let request = PageRequest {
            page: 0,
            size: FALLBACK_FETCH_CAP,
            sort: Some(("executedAt".to_string(), SortDir::Desc)),
            filter: LogFilter {
                from: range.from,
                to: range.to,
                ..LogFilter::default()
            },
        };
        Ok(self.client.fetch_logs(&request).await?.content)
    }
}

/// Groups rows by coalesced user id. No cap at this stage; the caller
/// truncates after sorting.
pub fn aggregate_by_user(rows: &[QueryLogRow]) -> Vec<UserBucket> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        *counts
            .entry(coalesce_user(row.user_id.as_deref()))
            .or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(user_id, count)| UserBucket { user_id, count })
        .collect()
}

/// Buckets rows by hour within the inclusive `[from 00:00, to 23:59:59]`
/// window. All 24 labels are emitted, zero-filled, regardless of sparsity.
pub fn aggregate_by_hour(rows: &[QueryLogRow], range: &DateRange) -> Vec<HourBucket> {
    let lower = range.from.map(shared::time::day_start);
    let upper = range.to.map(shared::time::day_end);

    let mut counts = [0u64; HOURS_PER_DAY as usize];
    for row in rows {
        if lower.is_some_and(|bound| row.executed_at < bound) {
            continue;
        }
        if upper.is_some_and(|bound| row.executed_at > bound) {
            continue;
        }
        counts[row.executed_at.hour() as usize] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourBucket {
            hour_label: hour_label(hour as u32),
            count,
        })
        .collect()
}

/// The zero-filled 24-entry series.
pub fn empty_hour_series() -> Vec<HourBucket> {
    (0..HOURS_PER_DAY)
        .map(|hour| HourBucket {
            hour_label: hour_label(hour),
            count: 0,
        })
        .collect()
}

/// Expands sparse hour buckets into the full 24-entry series. The rendered
/// histogram always spans `00:00`..`23:00` regardless of where the counts
/// came from.
pub fn fill_hour_series(buckets: Vec<HourBucket>) -> Vec<HourBucket> {
    let mut series = empty_hour_series();
    for bucket in buckets {
        if let Some(slot) = series.iter_mut().find(|s| s.hour_label == bucket.hour_label) {
            slot.count += bucket.count;
        }
    }
    series
}
