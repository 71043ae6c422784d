//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use domain::{
    AdminRole, DateRange, EventFilter, EventKind, LogFilter, LogSortField, QueryStatus, Severity,
    SortDir,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "dbids",
    version,
    about = "Admin console for the DBIDS backend",
    propagate_version = true
)]
pub struct Cli {
    /// Backend base URL (overrides configuration).
    #[arg(long, global = true, env = "DBIDS_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the admin profile locally.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DBIDS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new admin account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DBIDS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Reader)]
        role: RoleArg,
    },
    /// Clear the stored session (and notify the server, best effort).
    Logout,
    /// Show the logged-in admin, as the server sees it.
    Whoami,
    /// Change the password of the logged-in admin.
    Passwd {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
    /// List query logs.
    Logs(LogsArgs),
    /// List detection events.
    Events(EventsArgs),
    /// Usage statistics: top users and hourly histogram.
    Stats {
        /// Range start (YYYY-MM-DD); unparseable input means no bound.
        #[arg(long)]
        from: Option<String>,
        /// Range end (YYYY-MM-DD); unparseable input means no bound.
        #[arg(long)]
        to: Option<String>,
    },
    /// Export query logs as CSV.
    Export(ExportArgs),
    /// Alert channel settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCmd,
    },
    /// Follow the live detection event stream.
    Follow,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Full-text match against the SQL summary.
    #[arg(long)]
    pub keywords: Option<String>,
    /// Filter by user id or email.
    #[arg(long)]
    pub user: Option<String>,
    /// Filter by status; repeatable.
    #[arg(long = "status", value_enum)]
    pub status: Vec<StatusArg>,
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub rows_min: Option<i64>,
    #[arg(long)]
    pub rows_max: Option<i64>,
    #[arg(long, default_value_t = 20)]
    pub size: u32,
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long, value_enum, default_value_t = SortArg::ExecutedAt)]
    pub sort: SortArg,
    #[arg(long, value_enum, default_value_t = DirArg::Desc)]
    pub dir: DirArg,
    /// Show the SQL summary and raw SQL of this row id.
    #[arg(long)]
    pub expand: Option<String>,
    /// Keep refreshing the current page until Ctrl-C.
    #[arg(long)]
    pub watch: bool,
}

impl LogsArgs {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            keywords: self.keywords.clone(),
            user: self.user.clone(),
            status: self.status.iter().map(|s| QueryStatus::from(*s)).collect(),
            from: self
                .from
                .as_deref()
                .and_then(shared::time::parse_date_bound),
            to: self.to.as_deref().and_then(shared::time::parse_date_bound),
            rows_min: self.rows_min,
            rows_max: self.rows_max,
        }
    }
}

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[arg(long = "type", value_enum)]
    pub kind: Option<KindArg>,
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,
    #[arg(long)]
    pub user: Option<String>,
    /// Full-text match against the SQL preview.
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long, default_value_t = 50)]
    pub size: u32,
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Keep refreshing the current page until Ctrl-C.
    #[arg(long)]
    pub watch: bool,
}

impl EventsArgs {
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            kind: self.kind.map(EventKind::from),
            severity: self.severity.map(Severity::from),
            user: self.user.clone(),
            query: self.query.clone(),
            from: self
                .from
                .as_deref()
                .and_then(shared::time::parse_date_bound),
            to: self.to.as_deref().and_then(shared::time::parse_date_bound),
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long = "status", value_enum)]
    pub status: Vec<StatusArg>,
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub rows_min: Option<i64>,
    #[arg(long)]
    pub rows_max: Option<i64>,
    /// Rows to include.
    #[arg(long, default_value_t = 1000)]
    pub size: u32,
    /// Output file; defaults to the server-suggested name.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            keywords: self.keywords.clone(),
            user: self.user.clone(),
            status: self.status.iter().map(|s| QueryStatus::from(*s)).collect(),
            from: self
                .from
                .as_deref()
                .and_then(shared::time::parse_date_bound),
            to: self.to.as_deref().and_then(shared::time::parse_date_bound),
            rows_min: self.rows_min,
            rows_max: self.rows_max,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SettingsCmd {
    /// Show the current alert channels.
    Show,
    /// Update alert channels; at least one must be provided.
    Set {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        slack_webhook: Option<String>,
    },
}

/// Builds the stats range: explicit bounds when given, last seven days
/// otherwise (matching the dashboard default).
pub fn stats_range(from: Option<&str>, to: Option<&str>) -> DateRange {
    if from.is_none() && to.is_none() {
        DateRange::last_week(chrono::Local::now().date_naive())
    } else {
        DateRange::parse(from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Reader,
    Writer,
    Dba,
}

impl From<RoleArg> for AdminRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Reader => AdminRole::Reader,
            RoleArg::Writer => AdminRole::Writer,
            RoleArg::Dba => AdminRole::Dba,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Success,
    Failure,
    Deny,
}

impl From<StatusArg> for QueryStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Success => QueryStatus::Success,
            StatusArg::Failure => QueryStatus::Failure,
            StatusArg::Deny => QueryStatus::Deny,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    ExecutedAt,
    UserId,
    Status,
    ReturnRows,
}

impl From<SortArg> for LogSortField {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::ExecutedAt => LogSortField::ExecutedAt,
            SortArg::UserId => LogSortField::UserId,
            SortArg::Status => LogSortField::Status,
            SortArg::ReturnRows => LogSortField::ReturnRows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirArg {
    Asc,
    Desc,
}

impl From<DirArg> for SortDir {
    fn from(dir: DirArg) -> Self {
        match dir {
            DirArg::Asc => SortDir::Asc,
            DirArg::Desc => SortDir::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Pattern,
    Behavior,
    Authz,
}

impl From<KindArg> for EventKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pattern => EventKind::Pattern,
            KindArg::Behavior => EventKind::Behavior,
            KindArg::Authz => EventKind::Authz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
}

impl From<SeverityArg> for Severity {
    fn from(severity: SeverityArg) -> Self {
        match severity {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
        }
    }
}
