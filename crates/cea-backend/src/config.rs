//! Backend client configuration.
//!
//! The hosted backend is addressed by one base URL; every request carries
//! the project's anonymous key in the `apikey` header.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the hosted backend.
///
/// `Debug` redacts `anon_key`.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.example.co`.
    pub base_url: Url,
    /// Anonymous (publishable) project key.
    pub anon_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BackendConfig {
    /// Build a configuration with the default timeout.
    pub fn new(base_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            base_url,
            anon_key: Zeroizing::new(anon_key.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CEA_BACKEND_URL` (required)
    /// - `CEA_BACKEND_ANON_KEY` (required)
    /// - `CEA_BACKEND_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("CEA_BACKEND_URL").map_err(|_| ConfigError::MissingUrl)?;
        let base_url = parse_url("CEA_BACKEND_URL", &raw_url)?;
        let anon_key = std::env::var("CEA_BACKEND_ANON_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingAnonKey)?;

        Ok(Self {
            base_url,
            anon_key: Zeroizing::new(anon_key),
            timeout_secs: std::env::var("CEA_BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// `path` resolved against the base URL, keeping any base path prefix.
    pub(crate) fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CEA_BACKEND_URL environment variable is required")]
    MissingUrl,
    #[error("CEA_BACKEND_ANON_KEY environment variable is required")]
    MissingAnonKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
