//! Detection event models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::page::{Identified, QueryFilter};
use super::query_log::QueryStatus;

/// Detection severity. Unknown values decode as [`Severity::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Unknown,
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Severity::Unknown)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Which detector raised the event. Unknown values decode as
/// [`EventKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum EventKind {
    Pattern,
    Behavior,
    Authz,
    Unknown,
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(EventKind::Unknown)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Pattern => write!(f, "PATTERN"),
            EventKind::Behavior => write!(f, "BEHAVIOR"),
            EventKind::Authz => write!(f, "AUTHZ"),
            EventKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PATTERN" => Ok(EventKind::Pattern),
            "BEHAVIOR" => Ok(EventKind::Behavior),
            "AUTHZ" => Ok(EventKind::Authz),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

/// One detection event as listed by `GET /api/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub id: String,
    #[serde(default)]
    pub log_id: Option<String>,
    pub event_type: EventKind,
    pub severity: Severity,
    #[serde(with = "shared::time::flexible")]
    pub occurred_at: NaiveDateTime,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_preview: Option<String>,
}

impl Identified for DetectionEvent {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// `GET /api/events/{id}`: event plus a snapshot of the originating log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: String,
    #[serde(default)]
    pub log_id: Option<String>,
    pub event_type: EventKind,
    pub severity: Severity,
    #[serde(with = "shared::time::flexible")]
    pub occurred_at: NaiveDateTime,
    #[serde(default)]
    pub sql_raw: Option<String>,
    #[serde(default, with = "shared::time::flexible_opt")]
    pub executed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub sql_summary: Option<String>,
    #[serde(default)]
    pub return_rows: Option<i64>,
    #[serde(default)]
    pub status: Option<QueryStatus>,
}

/// Event listing filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub kind: Option<EventKind>,
    pub severity: Option<Severity>,
    pub user: Option<String>,
    pub query: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl QueryFilter for EventFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.to_string()));
        }
        if let Some(severity) = self.severity {
            pairs.push(("severity", severity.to_string()));
        }
        if let Some(user) = self.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            pairs.push(("user", user.to_string()));
        }
        if let Some(q) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Event pushed over the live stream.
///
/// The stream uses its own field names (`eventId`, `type`) distinct from the
/// REST listing shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub event_id: String,
    #[serde(default)]
    pub log_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub severity: Severity,
    #[serde(with = "shared::time::flexible")]
    pub occurred_at: NaiveDateTime,
    #[serde(default)]
    pub sql_raw: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
