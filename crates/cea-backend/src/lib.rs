//! # cea-backend: Hosted Backend Client
//!
//! Typed async access to the backend-as-a-service that stores every piece
//! of agent desk data. Two surfaces:
//!
//! - **Auth** (`/auth/v1`): password sign-in, user lookup, sign-out.
//! - **Tables** (`/rest/v1/{table}`): filtered selects, exact counts,
//!   inserts and updates.
//!
//! Every request carries the project key in `apikey`; table requests also
//! carry the signed-in user's bearer token so the backend's row-level
//! security applies.
//!
//! ## Tables
//!
//! | Table | Client |
//! |-------|--------|
//! | `cea_licenses` | [`licenses::LicenseClient`] |
//! | `user_profiles`, `users` | [`profiles::ProfileClient`] |
//! | `cpd_records` | [`cpd::CpdClient`] |
//! | `client_profiles`, `property_profiles` | [`stats::StatsClient`] |

pub mod account;
pub mod auth;
pub mod config;
pub mod cpd;
pub mod error;
pub mod licenses;
pub mod profiles;
pub mod rest;
pub(crate) mod retry;
pub mod stats;
pub mod types;

pub use account::{LicensedSession, LoginError, NO_VALID_LICENSE};
pub use config::{BackendConfig, ConfigError};
pub use error::BackendError;
pub use rest::Query;
pub use types::{AccessToken, Session};

use std::sync::Arc;
use std::time::Duration;

/// Top-level backend client. Holds one sub-client per resource.
#[derive(Debug, Clone)]
pub struct BackendClient {
    auth: auth::AuthClient,
    licenses: licenses::LicenseClient,
    profiles: profiles::ProfileClient,
    cpd: cpd::CpdClient,
    stats: stats::StatsClient,
}

impl BackendClient {
    /// Create a client from configuration.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    "apikey",
                    reqwest::header::HeaderValue::from_str(config.anon_key.as_str())
                        .map_err(|_| BackendError::Config(ConfigError::MissingAnonKey))?,
                );
                headers
            })
            .build()
            .map_err(|e| BackendError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let config = Arc::new(config);
        let rest = rest::RestClient::new(http.clone(), config.clone());
        Ok(Self {
            auth: auth::AuthClient::new(http, config),
            licenses: licenses::LicenseClient::new(rest.clone()),
            profiles: profiles::ProfileClient::new(rest.clone()),
            cpd: cpd::CpdClient::new(rest.clone()),
            stats: stats::StatsClient::new(rest),
        })
    }

    pub fn auth(&self) -> &auth::AuthClient {
        &self.auth
    }

    pub fn licenses(&self) -> &licenses::LicenseClient {
        &self.licenses
    }

    pub fn profiles(&self) -> &profiles::ProfileClient {
        &self.profiles
    }

    pub fn cpd(&self) -> &cpd::CpdClient {
        &self.cpd
    }

    pub fn stats(&self) -> &stats::StatsClient {
        &self.stats
    }
}
