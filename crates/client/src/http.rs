//! HTTP transport against the DBIDS backend.

use domain::ApiErrorBody;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::{ApiFailure, ClientError};
use crate::session::Session;

/// Thin wrapper over `reqwest` carrying the backend base URL and the owned
/// session used to decorate every outbound request.
pub struct ApiClient {
    http: Client,
    /// Separate client for the live stream: a total-request timeout would
    /// kill a healthy long-lived connection.
    stream_http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<Session>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        let stream_http = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            http,
            stream_http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    pub(crate) fn stream_get(&self, path: &str) -> RequestBuilder {
        self.stream_http.get(self.url(path))
    }

    /// Sends a decorated request through the authenticated path.
    ///
    /// A 401 here is the cross-cutting session-expiry signal: the stored
    /// profile is cleared before the error reaches the call site.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.session.decorate(request).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("received 401; clearing stored session");
            if let Err(err) = self.session.logout() {
                warn!(error = %err, "failed to clear session store");
            }
            return Err(ClientError::Unauthorized);
        }
        Self::check(response).await
    }

    /// Sends a decorated request without the forced-logout hook.
    ///
    /// Used by login/register, where a 401 carries a domain error
    /// (`INVALID_CREDENTIALS`, `ACCOUNT_LOCKED`, remaining attempts) that
    /// must reach the caller verbatim.
    pub(crate) async fn send_raw(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.session.decorate(request).send().await?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        Err(ClientError::Api(ApiFailure::new(status.as_u16(), body)))
    }
}
