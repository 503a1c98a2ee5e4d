//! Hosted provider configuration.
//!
//! LearnHub delegates identities, sessions and row storage to a hosted
//! Postgres backend exposing a GoTrue-compatible auth API under
//! `/auth/v1` and a PostgREST-compatible data API under `/rest/v1`.
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL`: Base URL of the project (required)
//! - `SUPABASE_ANON_KEY`: Public API key sent as `apikey` on every call (required)
//! - `SUPABASE_SERVICE_ROLE_KEY`: Key for admin user updates (optional)
//! - `PROVIDER_TIMEOUT_SECS`: Per-request timeout (default: 10)

use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
    pub timeout_secs: u64,
}

// Keys stay out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid("SUPABASE_URL"));
        }

        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }

        Ok(Self {
            url,
            anon_key,
            service_role_key: None,
            timeout_secs: 10,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("SUPABASE_URL").map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key =
            env::var("SUPABASE_ANON_KEY").map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let mut config = Self::new(url, anon_key)?;
        config.service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        config.timeout_secs = env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Base of the GoTrue-compatible auth API.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// Base of the PostgREST-compatible data API.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}
