//! Session commands: login, register, logout, whoami, passwd.

use anyhow::Result;
use client::ApiClient;
use domain::AdminRole;

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<()> {
    let profile = client.login(email, password).await?;
    let role = profile
        .role
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("logged in as {} (role {})", profile.email, role);
    Ok(())
}

pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    role: AdminRole,
) -> Result<()> {
    client.register(email, password, role).await?;
    println!("registered {}; log in to continue", email);
    Ok(())
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    client.logout().await?;
    println!("logged out");
    Ok(())
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    let profile = client.me().await?;
    println!("admin id:   {}", profile.admin_id);
    println!("email:      {}", profile.email);
    println!(
        "role:       {}",
        profile
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if let Some(last_login) = &profile.last_login {
        println!("last login: {}", last_login);
    }
    Ok(())
}

pub async fn change_password(client: &ApiClient, old: &str, new: &str) -> Result<()> {
    client.change_password(old, new).await?;
    println!("password changed");
    Ok(())
}
