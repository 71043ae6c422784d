//! Alert channel settings.

use anyhow::Result;
use client::ApiClient;
use domain::AlertSettings;

use crate::cli::SettingsCmd;

pub async fn run(client: &ApiClient, action: SettingsCmd) -> Result<()> {
    match action {
        SettingsCmd::Show => {
            let settings = client.fetch_alert_settings().await?;
            println!(
                "email:         {}",
                settings.email.as_deref().unwrap_or("(not set)")
            );
            println!(
                "slack webhook: {}",
                settings.slack_webhook.as_deref().unwrap_or("(not set)")
            );
        }
        SettingsCmd::Set {
            email,
            slack_webhook,
        } => {
            let settings = AlertSettings::from_input(email.as_deref(), slack_webhook.as_deref());
            client.update_alert_settings(&settings).await?;
            println!("alert settings saved");
        }
    }
    Ok(())
}
