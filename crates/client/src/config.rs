//! Configuration types for the ERPNext client.

use crate::error::{ErpNextError, ErpNextResult};
use std::time::Duration;
use url::Url;

/// Environment variable holding the ERPNext base URL.
pub const ENV_URL: &str = "ERPNEXT_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "ERPNEXT_API_KEY";
/// Environment variable holding the API secret.
pub const ENV_API_SECRET: &str = "ERPNEXT_API_SECRET";

/// API key/secret pair for token authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Value of the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("token {}:{}", self.api_key, self.api_secret)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for the ERPNext client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the ERPNext site, without a trailing slash.
    pub base_url: String,
    /// Token credentials; `None` leaves the client unauthenticated.
    pub credentials: Option<Credentials>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration from a base URL and an optional key/secret pair.
    ///
    /// Credentials are only kept when both halves are present and non-empty.
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> ErpNextResult<Self> {
        let trimmed = base_url.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ErpNextError::Config(format!(
                "{} environment variable is required",
                ENV_URL
            )));
        }

        let base_url = trimmed.strip_suffix('/').unwrap_or(trimmed).to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| ErpNextError::Config(format!("Invalid ERPNext URL {}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ErpNextError::Config(format!(
                "ERPNext URL must use http or https, got: {}",
                parsed.scheme()
            )));
        }

        let credentials = match (
            api_key.filter(|k| !k.is_empty()),
            api_secret.filter(|s| !s.is_empty()),
        ) {
            (Some(api_key), Some(api_secret)) => Some(Credentials {
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            base_url,
            credentials,
            timeout: None,
        })
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> ErpNextResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ErpNextResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_URL).unwrap_or_default();
        Self::new(base_url, lookup(ENV_API_KEY), lookup(ENV_API_SECRET))
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether both halves of the API credentials were supplied.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}
