//! Session types returned by the auth endpoints.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use cea_core::AuthUser;

/// A user access token. `Debug` redacts it; memory is zeroed on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for AccessToken {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0.as_str().to_string()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// A signed-in session.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: AccessToken,
    #[serde(default)]
    pub refresh_token: Option<AccessToken>,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Error body of the auth endpoints. Field names vary between versions.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.message)
    }
}
