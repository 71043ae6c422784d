//! Authentication endpoints.

use domain::{AdminProfile, AdminRole, ChangePasswordRequest, LoginRequest, RegisterRequest};
use tracing::{debug, info};
use validator::Validate;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// `POST /api/auth/login`.
    ///
    /// On success the returned profile becomes the active session and is
    /// persisted. Credential failures surface as [`ClientError::Api`] with
    /// the server's code and remaining-attempts count intact.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminProfile, ClientError> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let response = self
            .send_raw(self.post("/api/auth/login").json(&request))
            .await?;
        let mut profile: AdminProfile = response.json().await?;

        // Some backends omit the email in the profile; fall back to the
        // submitted one, normalized either way.
        if profile.email.trim().is_empty() {
            profile.email = request.email.clone();
        } else {
            profile.email = shared::validation::normalize_email(&profile.email);
        }

        self.session().login(profile.clone())?;
        info!(email = %profile.email, "logged in");
        Ok(profile)
    }

    /// `POST /api/auth/register`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<(), ClientError> {
        let request = RegisterRequest::new(email, password, role);
        request.validate()?;
        self.send_raw(self.post("/api/auth/register").json(&request))
            .await?;
        Ok(())
    }

    /// Ends the session: best-effort server call, then the local clear. The
    /// local clear always runs, so logout succeeds even against a dead or
    /// already-expired backend.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.session().is_authenticated() {
            if let Err(err) = self.send(self.post("/api/auth/logout")).await {
                debug!(error = %err, "server logout call failed");
            }
        }
        self.session().logout()?;
        Ok(())
    }

    /// `PATCH /api/auth/password` for the logged-in admin.
    pub async fn change_password(&self, old: &str, new: &str) -> Result<(), ClientError> {
        let profile = self.session().profile().ok_or(ClientError::NotLoggedIn)?;
        let request = ChangePasswordRequest {
            admin_id: profile.admin_id,
            old_password: old.to_string(),
            new_password: new.to_string(),
        };
        request.validate()?;
        self.send(self.patch("/api/auth/password").json(&request))
            .await?;
        Ok(())
    }

    /// `GET /api/auth/me/{adminId}`: the server's view of the current admin.
    pub async fn me(&self) -> Result<AdminProfile, ClientError> {
        let profile = self.session().profile().ok_or(ClientError::NotLoggedIn)?;
        let response = self
            .send(self.get(&format!("/api/auth/me/{}", profile.admin_id)))
            .await?;
        Ok(response.json().await?)
    }
}
