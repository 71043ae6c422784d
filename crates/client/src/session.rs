//! Durable admin session.
//!
//! The profile returned by login is the whole session: it persists in a JSON
//! file across invocations and feeds the outbound request decoration. The
//! [`Session`] object owns that state explicitly; there is no hidden global.

use domain::AdminProfile;
use reqwest::RequestBuilder;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Header naming the acting admin on every decorated request.
pub const ADMIN_EMAIL_HEADER: &str = "X-Admin-Email";

/// File-backed profile storage.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default per-user location: `<config dir>/dbids-console/profile.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dbids-console")
            .join("profile.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored profile. A missing or corrupt file yields `None`;
    /// corruption is logged and treated as "not logged in".
    pub fn load(&self) -> Option<AdminProfile> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring corrupt profile file"
                );
                None
            }
        }
    }

    pub fn save(&self, profile: &AdminProfile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(profile).map_err(io::Error::other)?;
        std::fs::write(&self.path, raw)
    }

    /// Removes the stored profile. Removing an already-absent file succeeds.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// The owned session object: current profile plus its durable store.
///
/// Logout is idempotent and is invoked from both the explicit `logout`
/// command and the implicit forced-logout path on a 401 response.
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    profile: RwLock<Option<AdminProfile>>,
}

impl Session {
    /// Loads any stored profile and takes ownership of the store.
    pub fn init(store: SessionStore) -> Self {
        let profile = store.load();
        if let Some(profile) = &profile {
            debug!(email = %profile.email, "restored stored session");
        }
        Self {
            store,
            profile: RwLock::new(profile),
        }
    }

    pub fn profile(&self) -> Option<AdminProfile> {
        self.profile.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.read().expect("session lock poisoned").is_some()
    }

    pub fn login(&self, profile: AdminProfile) -> io::Result<()> {
        self.store.save(&profile)?;
        *self.profile.write().expect("session lock poisoned") = Some(profile);
        Ok(())
    }

    pub fn logout(&self) -> io::Result<()> {
        self.profile.write().expect("session lock poisoned").take();
        self.store.clear()
    }

    /// Decorates an outbound request with the session identity: bearer token
    /// when one is held, acting-admin email when a profile is present.
    pub fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        let Some(profile) = self.profile() else {
            return request;
        };
        let mut request = request;
        if let Some(token) = &profile.access_token {
            request = request.bearer_auth(token);
        }
        request.header(ADMIN_EMAIL_HEADER, profile.email.as_str())
    }
}
