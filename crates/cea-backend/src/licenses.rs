//! `cea_licenses` table.

use cea_core::{License, LicenseStatus, UserId};

use crate::error::BackendError;
use crate::rest::{Query, RestClient};
use crate::types::AccessToken;

pub const TABLE: &str = "cea_licenses";

/// Client for CEA license rows.
#[derive(Debug, Clone)]
pub struct LicenseClient {
    rest: RestClient,
}

impl LicenseClient {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Licenses of `user` with status `Active`. The validity window is not
    /// checked here.
    pub async fn active_for_user(&self, token: &AccessToken, user: UserId) -> Result<Vec<License>, BackendError> {
        let query = Query::table(TABLE)
            .eq("user_id", user)
            .eq("status", LicenseStatus::Active.as_str());
        self.rest.select(token, &query).await
    }
}
