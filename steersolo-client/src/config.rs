//! Client configuration

use shared::preferences::Preferences;
use shared::storage::StorageError;
use std::path::PathBuf;

use crate::error::{ClientError, ClientResult};
use crate::store::RedbStore;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for the SteerSolo backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend project URL (e.g., "https://xyz.supabase.co")
    pub base_url: String,

    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,

    /// Signed-in user's access token; the anon key is used as bearer when absent
    pub access_token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// redb file for persisted UI preferences
    pub store_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            store_path: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `STEERSOLO_BACKEND_URL` (required)
    /// - `STEERSOLO_ANON_KEY` (required)
    /// - `STEERSOLO_ACCESS_TOKEN`
    /// - `STEERSOLO_TIMEOUT_SECS` (default 30)
    /// - `STEERSOLO_STORE_PATH`
    pub fn from_env() -> ClientResult<Self> {
        let base_url = require_env("STEERSOLO_BACKEND_URL")?;
        let anon_key = require_env("STEERSOLO_ANON_KEY")?;

        let mut config = Self::new(base_url, anon_key);
        config.access_token = std::env::var("STEERSOLO_ACCESS_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());
        config.timeout = std::env::var("STEERSOLO_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        config.store_path = std::env::var("STEERSOLO_STORE_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        config.validate()?;
        Ok(config)
    }

    /// Set the access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the preferences store path
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "backend URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.anon_key.is_empty() {
            return Err(ClientError::Config("anon key must not be empty".into()));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    /// `<base>/rest/v1/<table>`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    /// `<base>/functions/v1/<name>`
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// Open the preferences store at `store_path`, `None` when no path is configured
    pub fn open_preferences(&self) -> ClientResult<Option<Preferences<RedbStore>>> {
        let Some(path) = &self.store_path else {
            return Ok(None);
        };
        let prefs = crate::store::open_preferences(path).map_err(StorageError::from)?;
        Ok(Some(prefs))
    }

    /// Create a backend client from this configuration
    pub fn build_client(&self) -> ClientResult<super::BackendClient> {
        super::BackendClient::new(self)
    }
}

fn require_env(name: &str) -> ClientResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::Config(format!("{name} must be set"))),
    }
}
