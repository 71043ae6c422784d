//! Domain models for the DBIDS console.
//!
//! Wire shapes exchanged with the DBIDS backend (query logs, detection
//! events, admin profiles, alert settings) and the derived view types
//! (pages, usage buckets). The backend serializes in camelCase; every wire
//! struct here carries the matching serde rename.

pub mod models;

pub use models::*;
