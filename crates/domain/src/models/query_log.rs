//! Query log models and listing filter.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::page::{Identified, QueryFilter};

/// Outcome of a proxied query. Values the backend adds later decode as
/// [`QueryStatus::Unknown`] instead of failing the whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum QueryStatus {
    Success,
    Failure,
    Deny,
    Unknown,
}

impl From<String> for QueryStatus {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(QueryStatus::Unknown)
    }
}

impl FromStr for QueryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUCCESS" => Ok(QueryStatus::Success),
            "FAILURE" => Ok(QueryStatus::Failure),
            "DENY" => Ok(QueryStatus::Deny),
            _ => Err(format!("Unknown query status: {}", s)),
        }
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryStatus::Success => write!(f, "SUCCESS"),
            QueryStatus::Failure => write!(f, "FAILURE"),
            QueryStatus::Deny => write!(f, "DENY"),
            QueryStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One captured query log row.
///
/// `sql_raw` is the canonical raw-SQL field; the backend has historically
/// emitted it as `sql` or `sqlFull` as well, accepted here as decode-time
/// aliases only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogRow {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
    #[serde(with = "shared::time::flexible")]
    pub executed_at: NaiveDateTime,
    pub status: QueryStatus,
    #[serde(default)]
    pub return_rows: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_summary: Option<String>,
    #[serde(
        default,
        alias = "sql",
        alias = "sqlFull",
        skip_serializing_if = "Option::is_none"
    )]
    pub sql_raw: Option<String>,
}

impl Identified for QueryLogRow {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Sortable query log columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSortField {
    ExecutedAt,
    UserId,
    Status,
    ReturnRows,
}

impl std::fmt::Display for LogSortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSortField::ExecutedAt => write!(f, "executedAt"),
            LogSortField::UserId => write!(f, "userId"),
            LogSortField::Status => write!(f, "status"),
            LogSortField::ReturnRows => write!(f, "returnRows"),
        }
    }
}

/// Query log listing filter.
///
/// Blank text fields are omitted from the request entirely, matching the
/// backend's optional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub keywords: Option<String>,
    pub user: Option<String>,
    pub status: Vec<QueryStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub rows_min: Option<i64>,
    pub rows_max: Option<i64>,
}

impl QueryFilter for LogFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keywords) = trimmed(&self.keywords) {
            pairs.push(("keywords", keywords));
        }
        if let Some(user) = trimmed(&self.user) {
            pairs.push(("user", user));
        }
        for status in &self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(rows_min) = self.rows_min {
            pairs.push(("rowsMin", rows_min.to_string()));
        }
        if let Some(rows_max) = self.rows_max {
            pairs.push(("rowsMax", rows_max.to_string()));
        }
        pairs
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
