//! Client for the password-auth endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/auth/v1/token?grant_type=password` | sign in |
//! | GET | `/auth/v1/user` | user behind a token |
//! | POST | `/auth/v1/logout` | revoke a token |

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use cea_core::AuthUser;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::rest::check_status;
use crate::types::{AccessToken, AuthErrorBody, Session};

const AUTH_PREFIX: &str = "auth/v1";

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, config: Arc<BackendConfig>) -> Self {
        Self { http, config }
    }

    /// Exchange email and password for a session.
    ///
    /// Credential rejections (400/401/422) become
    /// [`BackendError::AuthRejected`] carrying the backend's message.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let endpoint = "POST /auth/v1/token";
        let url = self.config.endpoint_url(&format!("{AUTH_PREFIX}/token"));

        let resp = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header(AUTHORIZATION, format!("Bearer {}", self.config.anon_key.as_str()))
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if matches!(resp.status().as_u16(), 400 | 401 | 422) {
            let body: AuthErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .into_message()
                .unwrap_or_else(|| "Invalid login credentials".to_string());
            tracing::info!(email, "sign-in rejected by backend");
            return Err(BackendError::AuthRejected { message });
        }

        let resp = check_status(endpoint, resp).await?;
        resp.json().await.map_err(|e| BackendError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// The user a token belongs to.
    pub async fn get_user(&self, token: &AccessToken) -> Result<AuthUser, BackendError> {
        let endpoint = "GET /auth/v1/user";
        let url = self.config.endpoint_url(&format!("{AUTH_PREFIX}/user"));
        let bearer = format!("Bearer {}", token.as_str());

        let resp = crate::retry::retry_send(endpoint, || {
            self.http.get(&url).header(AUTHORIZATION, bearer.as_str()).send()
        })
        .await
        .map_err(|e| BackendError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        let resp = check_status(endpoint, resp).await?;
        resp.json().await.map_err(|e| BackendError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Revoke `token`.
    pub async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        let endpoint = "POST /auth/v1/logout";
        let url = self.config.endpoint_url(&format!("{AUTH_PREFIX}/logout"));

        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        check_status(endpoint, resp).await.map(|_| ())
    }
}
