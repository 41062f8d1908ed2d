//! Row counts for the dashboard.

use crate::error::BackendError;
use crate::rest::{Query, RestClient};
use crate::types::AccessToken;

pub const CLIENTS_TABLE: &str = "client_profiles";
pub const PROPERTIES_TABLE: &str = "property_profiles";

/// Client for exact row counts. Row-level security on the backend scopes
/// counts to the caller.
#[derive(Debug, Clone)]
pub struct StatsClient {
    rest: RestClient,
}

impl StatsClient {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn count_clients(&self, token: &AccessToken) -> Result<u64, BackendError> {
        self.count(token, CLIENTS_TABLE, "client_id").await
    }

    pub async fn count_properties(&self, token: &AccessToken) -> Result<u64, BackendError> {
        self.count(token, PROPERTIES_TABLE, "property_id").await
    }

    async fn count(&self, token: &AccessToken, table: &'static str, key: &str) -> Result<u64, BackendError> {
        self.rest.count(token, &Query::table(table).select(key)).await
    }
}
