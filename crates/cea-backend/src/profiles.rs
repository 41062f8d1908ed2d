//! `user_profiles` and `users` tables.

use serde::{Deserialize, Serialize};

use cea_core::{ProfileRow, UserId};

use crate::error::BackendError;
use crate::rest::{Query, RestClient};
use crate::types::AccessToken;

pub const PROFILES_TABLE: &str = "user_profiles";
pub const USERS_TABLE: &str = "users";

#[derive(Debug, Deserialize)]
struct ComplianceFlag {
    #[serde(default)]
    cpd_compliance_status: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ComplianceFlagPatch {
    cpd_compliance_status: bool,
}

/// Client for profile rows and the per-user compliance flag.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    rest: RestClient,
}

impl ProfileClient {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Profile row of `user`, if one exists.
    pub async fn get(&self, token: &AccessToken, user: UserId) -> Result<Option<ProfileRow>, BackendError> {
        let query = Query::table(PROFILES_TABLE).eq("user_id", user);
        self.rest.select_one(token, query).await
    }

    /// Stored CPD compliance flag of `user`; `None` when the row or the
    /// column is missing.
    pub async fn compliance_status(&self, token: &AccessToken, user: UserId) -> Result<Option<bool>, BackendError> {
        let query = Query::table(USERS_TABLE)
            .select("cpd_compliance_status")
            .eq("user_id", user);
        let row: Option<ComplianceFlag> = self.rest.select_one(token, query).await?;
        Ok(row.and_then(|r| r.cpd_compliance_status))
    }

    /// Overwrite the stored CPD compliance flag of `user`.
    pub async fn set_compliance_status(
        &self,
        token: &AccessToken,
        user: UserId,
        compliant: bool,
    ) -> Result<(), BackendError> {
        let query = Query::table(USERS_TABLE).eq("user_id", user);
        let _: Vec<serde_json::Value> = self
            .rest
            .update(token, &query, &ComplianceFlagPatch { cpd_compliance_status: compliant })
            .await?;
        tracing::info!(%user, compliant, "updated stored CPD compliance status");
        Ok(())
    }
}
