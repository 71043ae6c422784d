//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

/// Minimum admin password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum admin password length.
pub const MAX_PASSWORD_LEN: usize = 64;

lazy_static! {
    static ref SLACK_WEBHOOK_RE: Regex =
        Regex::new(r"^https://hooks\.slack\.com/.+").expect("valid webhook regex");
}

/// Validates that a string is a plausible email address.
pub fn validate_admin_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Must be a valid email address".into());
        Err(err)
    }
}

/// Validates password length (8 to 64 characters).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password must be 8-64 characters".into());
        Err(err)
    }
}

/// Validates that a URL is a Slack incoming-webhook endpoint.
pub fn validate_slack_webhook(url: &str) -> Result<(), ValidationError> {
    if SLACK_WEBHOOK_RE.is_match(url.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slack_webhook_format");
        err.message = Some("Must be an https://hooks.slack.com/ webhook URL".into());
        Err(err)
    }
}

/// Normalizes an email for transport and comparison: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
