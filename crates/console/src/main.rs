use anyhow::Result;
use clap::Parser;
use client::{ApiClient, Session, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

mod cli;
mod commands;
mod config;
mod logging;
mod render;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    let mut config = config::Config::load()?;
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }

    logging::init_logging(&config.logging);
    debug!(base_url = %config.api.base_url, "configuration loaded");

    let store = match &config.session.profile_path {
        Some(path) => SessionStore::new(path),
        None => SessionStore::new(SessionStore::default_path()),
    };
    let session = Arc::new(Session::init(store));
    let client = Arc::new(ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.request_timeout_secs),
        session,
    )?);

    commands::dispatch(args.command, client, &config).await
}
