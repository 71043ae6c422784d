//! Alert channel settings.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Alert delivery channels for detection notifications.
///
/// Both fields are optional on the wire; a `PATCH` carries only the fields
/// being changed. Saving requires at least one channel to be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_admin_email"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_slack_webhook"))]
    pub slack_webhook: Option<String>,
}

impl AlertSettings {
    /// Builds settings from raw form input, dropping blank fields.
    pub fn from_input(email: Option<&str>, slack_webhook: Option<&str>) -> Self {
        Self {
            email: email.map(str::trim).filter(|v| !v.is_empty()).map(String::from),
            slack_webhook: slack_webhook
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from),
        }
    }

    /// Field validation plus the at-least-one-channel rule.
    pub fn validate_for_save(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        if self.email.is_none() && self.slack_webhook.is_none() {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("no_channel");
            err.message = Some("Provide an email or a Slack webhook".into());
            errors.add("email", err);
            return Err(errors);
        }
        Ok(())
    }
}
