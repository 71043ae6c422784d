//! One module per backend resource.

mod auth;
mod events;
mod logs;
mod settings;

pub use logs::{ExportOutcome, SummaryDimension};
