//! `cpd_records` table.

use serde::Serialize;

use cea_core::{CpdRecord, CpdStatus, RecordId, UserId};

use crate::error::BackendError;
use crate::rest::{Query, RestClient};
use crate::types::AccessToken;

pub const TABLE: &str = "cpd_records";

/// Client for CPD records.
#[derive(Debug, Clone)]
pub struct CpdClient {
    rest: RestClient,
}

#[derive(Serialize)]
struct KeoPatch {
    keo_approved: bool,
}

impl CpdClient {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Completed records of `user` for `year`, newest first.
    pub async fn completed_for_year(
        &self,
        token: &AccessToken,
        user: UserId,
        year: i32,
    ) -> Result<Vec<CpdRecord>, BackendError> {
        let query = Query::table(TABLE)
            .eq("user_id", user)
            .eq("compliance_year", year)
            .eq("status", "Completed")
            .order_desc("completion_date");
        let records: Vec<CpdRecord> = self.rest.select(token, &query).await?;
        // Guard against backends that ignore unknown filters.
        Ok(records
            .into_iter()
            .filter(|r| r.status == CpdStatus::Completed)
            .collect())
    }

    /// One record by id.
    pub async fn get(&self, token: &AccessToken, id: RecordId) -> Result<Option<CpdRecord>, BackendError> {
        self.rest.select_one(token, Query::table(TABLE).eq("cpd_id", id)).await
    }

    /// Insert a new record and return it as stored.
    pub async fn insert<R: Serialize + ?Sized>(&self, token: &AccessToken, row: &R) -> Result<CpdRecord, BackendError> {
        self.rest.insert(token, TABLE, row).await
    }

    /// Set the KEO approval flag of a record.
    pub async fn set_keo_approved(
        &self,
        token: &AccessToken,
        id: RecordId,
        approved: bool,
    ) -> Result<CpdRecord, BackendError> {
        let endpoint = format!("PATCH /rest/v1/{TABLE}");
        let rows: Vec<CpdRecord> = self
            .rest
            .update(token, &Query::table(TABLE).eq("cpd_id", id), &KeoPatch { keo_approved: approved })
            .await?;
        rows.into_iter().next().ok_or(BackendError::EmptyResponse { endpoint })
    }
}
