//! Admin account and authentication models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Admin permission tier, mirrored from the backend enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminRole {
    Reader,
    Writer,
    Dba,
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READER" => Ok(AdminRole::Reader),
            "WRITER" => Ok(AdminRole::Writer),
            "DBA" => Ok(AdminRole::Dba),
            _ => Err(format!("Unknown admin role: {}", s)),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminRole::Reader => write!(f, "READER"),
            AdminRole::Writer => write!(f, "WRITER"),
            AdminRole::Dba => write!(f, "DBA"),
        }
    }
}

/// Locally persisted record identifying the logged-in admin.
///
/// Returned by `POST /api/auth/login` and stored verbatim until logout or a
/// 401 response clears it. The optional bearer token and email feed the
/// outbound request decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub admin_id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    // The backend has emitted both spellings over time.
    #[serde(default, alias = "lastlogin", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

/// `POST /api/auth/login` request body.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "shared::validation::validate_admin_email"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: shared::validation::normalize_email(email),
            password: password.to_string(),
        }
    }
}

/// `POST /api/auth/register` request body.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "shared::validation::validate_admin_email"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,
    pub role: AdminRole,
}

impl RegisterRequest {
    pub fn new(email: &str, password: &str, role: AdminRole) -> Self {
        Self {
            email: shared::validation::normalize_email(email),
            password: password.to_string(),
            role,
        }
    }
}

/// `PATCH /api/auth/password` request body.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub admin_id: Uuid,
    pub old_password: String,
    #[validate(custom(function = "shared::validation::validate_password"))]
    pub new_password: String,
}

/// Machine-readable error payload the backend attaches to 4xx responses.
///
/// The auth endpoints use `{code, message, attemptsLeft}`; older endpoints
/// return a bare `{error}` map. All fields are optional so either shape
/// decodes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub attempts_left: Option<u32>,
}

impl ApiErrorBody {
    /// The most specific machine-readable code present.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().or(self.error.as_deref())
    }
}

/// Well-known auth failure codes.
pub const CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const CODE_ACCOUNT_LOCKED: &str = "ACCOUNT_LOCKED";
