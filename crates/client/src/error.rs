//! Client error taxonomy.

use domain::ApiErrorBody;
use thiserror::Error;

/// Errors surfaced by the remote-access layer.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session expired or unauthorized; log in again")]
    Unauthorized,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    Api(ApiFailure),

    #[error("could not decode response: {0}")]
    Decode(#[from] DecodeError),

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        ClientError::Validation(details.join("; "))
    }
}

/// A non-2xx response from the backend, with whatever machine-readable
/// detail its body carried.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub status: u16,
    pub code: Option<String>,
    pub message: Option<String>,
    pub attempts_left: Option<u32>,
}

impl ApiFailure {
    pub fn new(status: u16, body: ApiErrorBody) -> Self {
        Self {
            status,
            code: body.code().map(str::to_string),
            message: body.message.clone(),
            attempts_left: body.attempts_left,
        }
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "server rejected request (HTTP {})", self.status)?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(attempts) = self.attempts_left {
            write!(f, " ({} attempts left)", attempts)?;
        }
        Ok(())
    }
}

/// Errors from the explicit response-shape decode step.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized summary shape: expected an array or an object with one of {expected:?}")]
    UnrecognizedShape { expected: &'static [&'static str] },

    #[error("unusable hour bucket token: {0}")]
    BadHourToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_failure_display() {
        let failure = ApiFailure {
            status: 401,
            code: Some("INVALID_CREDENTIALS".to_string()),
            message: Some("bad login".to_string()),
            attempts_left: Some(2),
        };
        assert_eq!(
            failure.to_string(),
            "server rejected request (HTTP 401) [INVALID_CREDENTIALS]: bad login (2 attempts left)"
        );
    }

    #[test]
    fn test_api_failure_minimal_display() {
        let failure = ApiFailure {
            status: 500,
            code: None,
            message: None,
            attempts_left: None,
        };
        assert_eq!(failure.to_string(), "server rejected request (HTTP 500)");
    }

    #[test]
    fn test_validation_errors_flatten() {
        use domain::LoginRequest;
        use validator::Validate;

        let err = LoginRequest::new("not-an-email", "short")
            .validate()
            .unwrap_err();
        let client_err: ClientError = err.into();
        let text = client_err.to_string();
        assert!(text.starts_with("validation failed"));
        assert!(text.contains("email"));
        assert!(text.contains("password"));
    }

    #[test]
    fn test_is_code() {
        let failure = ApiFailure {
            status: 423,
            code: Some("ACCOUNT_LOCKED".to_string()),
            message: None,
            attempts_left: None,
        };
        assert!(failure.is_code("ACCOUNT_LOCKED"));
        assert!(!failure.is_code("INVALID_CREDENTIALS"));
    }
}
