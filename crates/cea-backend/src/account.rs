//! # Account Flows
//!
//! Multi-call flows shared by every surface: license-gated sign-in and
//! loading the combined profile.

use chrono::NaiveDate;
use thiserror::Error;

use cea_core::{License, UserProfile};

use crate::error::BackendError;
use crate::types::{AccessToken, Session};
use crate::BackendClient;

/// Shown when sign-in succeeds but no license permits it.
pub const NO_VALID_LICENSE: &str = "No valid CEA license found. Please contact administrator.";

/// Why a sign-in failed.
#[derive(Error, Debug)]
pub enum LoginError {
    /// The backend refused the credentials.
    #[error("{0}")]
    Rejected(String),
    /// Credentials were fine but no active, in-window license exists.
    #[error("{}", NO_VALID_LICENSE)]
    NoValidLicense,
    /// Any other backend failure.
    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for LoginError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::AuthRejected { message } => Self::Rejected(message),
            other => Self::Backend(other),
        }
    }
}

/// A session whose holder has a license valid on the sign-in day.
#[derive(Debug, Clone)]
pub struct LicensedSession {
    pub session: Session,
    pub license: License,
}

impl BackendClient {
    /// Sign in and require a license that is active and within its
    /// validity window on `today`. Without one the new session is signed
    /// out again (best effort) and [`LoginError::NoValidLicense`] returned.
    pub async fn sign_in_licensed(
        &self,
        email: &str,
        password: &str,
        today: NaiveDate,
    ) -> Result<LicensedSession, LoginError> {
        let session = self.auth().sign_in_with_password(email, password).await?;
        let token = &session.access_token;

        let licenses = match self.licenses().active_for_user(token, session.user.id).await {
            Ok(licenses) => licenses,
            Err(e) => {
                self.sign_out_quietly(token).await;
                return Err(e.into());
            }
        };

        let mut rejections = Vec::new();
        let valid = licenses.into_iter().find(|l| match l.check_valid_on(today) {
            Ok(()) => true,
            Err(reason) => {
                rejections.push(reason.to_string());
                false
            }
        });

        match valid {
            Some(license) => {
                tracing::info!(user = %session.user.id, license = %license.license_number.as_str(), "signed in");
                Ok(LicensedSession { session, license })
            }
            None => {
                tracing::warn!(user = %session.user.id, ?rejections, "sign-in refused: no valid license");
                self.sign_out_quietly(token).await;
                Err(LoginError::NoValidLicense)
            }
        }
    }

    async fn sign_out_quietly(&self, token: &AccessToken) {
        if let Err(e) = self.auth().sign_out(token).await {
            tracing::warn!(error = %e, "backend sign-out failed");
        }
    }

    /// Load the combined profile of the token's user from the auth user,
    /// the profile row, the active license and the stored compliance flag.
    pub async fn load_profile(&self, token: &AccessToken) -> Result<UserProfile, BackendError> {
        let user = self.auth().get_user(token).await?;
        let profile = self.profiles().get(token, user.id).await?;
        let license = self
            .licenses()
            .active_for_user(token, user.id)
            .await?
            .into_iter()
            .next();
        let compliant = self
            .profiles()
            .compliance_status(token, user.id)
            .await?
            .unwrap_or(false);
        Ok(UserProfile::combine(&user, profile.as_ref(), license, compliant))
    }
}
