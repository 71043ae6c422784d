//! Alert settings endpoints.

use domain::AlertSettings;
use tracing::info;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// `GET /api/settings/alerts`: current alert channels for the acting
    /// admin (identified by the decorated `X-Admin-Email` header).
    pub async fn fetch_alert_settings(&self) -> Result<AlertSettings, ClientError> {
        let response = self.send(self.get("/api/settings/alerts")).await?;
        Ok(response.json().await?)
    }

    /// `PATCH /api/settings/alerts`: updates the provided channels only.
    /// Validation runs before any request is sent.
    pub async fn update_alert_settings(&self, settings: &AlertSettings) -> Result<(), ClientError> {
        settings
            .validate_for_save()
            .map_err(ClientError::from)?;
        self.send(self.patch("/api/settings/alerts").json(settings))
            .await?;
        info!("alert settings saved");
        Ok(())
    }
}
