//! Remote-access layer for the DBIDS console.
//!
//! Wraps the backend REST API behind [`ApiClient`], owns the durable admin
//! session, and hosts the two stateful view components: the paginated query
//! controller and the usage-statistics aggregator.

pub mod controller;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod session;
pub mod stats;
pub mod stream;

pub use controller::{
    ControllerOptions, FetchStatus, PageFetcher, PageView, PagedQueryController, PagerState,
    DEFAULT_DEBOUNCE, DEFAULT_POLL_INTERVAL,
};
pub use endpoints::{ExportOutcome, SummaryDimension};
pub use error::{ApiFailure, ClientError, DecodeError};
pub use http::ApiClient;
pub use session::{Session, SessionStore, ADMIN_EMAIL_HEADER};
pub use stats::{StatsAggregator, UsageStats, FALLBACK_FETCH_CAP, TOP_USER_LIMIT};
pub use stream::EventStream;
