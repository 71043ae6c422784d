//! One handler module per command area.

mod auth;
mod events;
mod export;
mod follow;
mod logs;
mod settings;
mod stats;

use anyhow::Result;
use client::ApiClient;
use std::sync::Arc;

use crate::cli::Command;
use crate::config::Config;

pub async fn dispatch(command: Command, client: Arc<ApiClient>, config: &Config) -> Result<()> {
    match command {
        Command::Login { email, password } => auth::login(&client, &email, &password).await,
        Command::Register {
            email,
            password,
            role,
        } => auth::register(&client, &email, &password, role.into()).await,
        Command::Logout => auth::logout(&client).await,
        Command::Whoami => auth::whoami(&client).await,
        Command::Passwd {
            old_password,
            new_password,
        } => auth::change_password(&client, &old_password, &new_password).await,
        Command::Logs(args) => logs::run(client, config, args).await,
        Command::Events(args) => events::run(client, config, args).await,
        Command::Stats { from, to } => stats::run(client, from.as_deref(), to.as_deref()).await,
        Command::Export(args) => export::run(&client, args).await,
        Command::Settings { action } => settings::run(&client, action).await,
        Command::Follow => follow::run(&client).await,
    }
}
