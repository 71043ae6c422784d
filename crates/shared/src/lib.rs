//! Shared utilities and common types for the DBIDS console.
//!
//! This crate provides common functionality used across all other crates:
//! - Input validation logic (emails, passwords, webhook URLs)
//! - Lenient timestamp and date-bound parsing for backend payloads

pub mod time;
pub mod validation;
