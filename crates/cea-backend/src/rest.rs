//! # Table REST
//!
//! Generic access to `{base}/rest/v1/{table}`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | select | `GET ?select=..&col=eq.v&order=col.desc&limit=n` |
//! | count | `HEAD` with `Prefer: count=exact`, total read from `Content-Range` |
//! | insert | `POST` JSON body, `Prefer: return=representation` |
//! | update | `PATCH` with filters, `Prefer: return=representation` |
//!
//! Reads are retried on transport failure; writes are sent once.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::types::AccessToken;

const REST_PREFIX: &str = "rest/v1";

/// Filters, projection and ordering for a table query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl Query {
    /// Every column of `table`, unfiltered.
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    /// `column = value`.
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// Query-string pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Filters only, for writes.
    fn filter_pairs(&self) -> &[(String, String)] {
        &self.filters
    }
}

/// Shared HTTP plumbing for table access.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
}

impl RestClient {
    pub(crate) fn new(http: reqwest::Client, config: Arc<BackendConfig>) -> Self {
        Self { http, config }
    }

    fn table_url(&self, table: &str) -> String {
        self.config.endpoint_url(&format!("{REST_PREFIX}/{table}"))
    }

    fn bearer(token: &AccessToken) -> Result<HeaderValue, BackendError> {
        HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|_| BackendError::Api {
            endpoint: "authorization".into(),
            status: 401,
            body: "access token is not a valid header value".into(),
        })
    }

    /// Rows matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let endpoint = format!("GET /{REST_PREFIX}/{}", query.table);
        let url = self.table_url(query.table);
        let auth = Self::bearer(token)?;
        let pairs = query.to_pairs();

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http
                .get(&url)
                .header(AUTHORIZATION, auth.clone())
                .query(&pairs)
                .send()
        })
        .await
        .map_err(|e| BackendError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let resp = check_status(&endpoint, resp).await?;
        resp.json().await.map_err(|e| BackendError::Deserialization { endpoint, source: e })
    }

    /// First row matching `query`, if any.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        query: Query,
    ) -> Result<Option<T>, BackendError> {
        let rows = self.select(token, &query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Exact number of rows matching `query`.
    pub async fn count(&self, token: &AccessToken, query: &Query) -> Result<u64, BackendError> {
        let endpoint = format!("HEAD /{REST_PREFIX}/{}", query.table);
        let url = self.table_url(query.table);
        let auth = Self::bearer(token)?;
        let pairs = query.to_pairs();

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http
                .head(&url)
                .header(AUTHORIZATION, auth.clone())
                .header("Prefer", "count=exact")
                .query(&pairs)
                .send()
        })
        .await
        .map_err(|e| BackendError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let resp = check_status(&endpoint, resp).await?;
        resp.headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or(BackendError::MissingCount { endpoint })
    }

    /// Insert one row and return it as stored.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &'static str,
        row: &B,
    ) -> Result<T, BackendError> {
        let endpoint = format!("POST /{REST_PREFIX}/{table}");
        let resp = self
            .http
            .post(self.table_url(table))
            .header(AUTHORIZATION, Self::bearer(token)?)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let resp = check_status(&endpoint, resp).await?;
        let rows: Vec<T> = resp.json().await.map_err(|e| BackendError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        rows.into_iter().next().ok_or(BackendError::EmptyResponse { endpoint })
    }

    /// Apply `patch` to rows matching the filters of `query`; returns the
    /// updated rows.
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        query: &Query,
        patch: &B,
    ) -> Result<Vec<T>, BackendError> {
        let endpoint = format!("PATCH /{REST_PREFIX}/{}", query.table);
        let resp = self
            .http
            .patch(self.table_url(query.table))
            .header(AUTHORIZATION, Self::bearer(token)?)
            .header("Prefer", "return=representation")
            .query(query.filter_pairs())
            .json(patch)
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let resp = check_status(&endpoint, resp).await?;
        resp.json().await.map_err(|e| BackendError::Deserialization { endpoint, source: e })
    }
}

/// Turn a non-2xx response into [`BackendError::Api`].
pub(crate) async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(BackendError::Api {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

/// Total from a `Content-Range` value such as `0-24/57` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_are_ordered() {
        let q = Query::table("cpd_records")
            .eq("user_id", "u1")
            .eq("compliance_year", 2026)
            .order_desc("completion_date")
            .limit(5);
        assert_eq!(
            q.to_pairs(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u1".to_string()),
                ("compliance_year".to_string(), "eq.2026".to_string()),
                ("order".to_string(), "completion_date.desc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn content_range_totals() {
        assert_eq!(parse_content_range_total("0-24/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
