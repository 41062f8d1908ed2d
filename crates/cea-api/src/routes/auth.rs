//! # Sign-in and Sign-out
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/v1/auth/login` | license-gated sign-in, issues a session |
//! | POST | `/v1/auth/logout` | end the session |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use cea_core::UserProfile;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::require_backend;
use crate::state::{AppState, SessionRecord};

/// Routes reachable without a session.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

/// Routes requiring a session.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("email must be an email address".into());
        }
        if self.password.is_empty() {
            return Err("password must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session id to present as `Authorization: Bearer {token}`.
    pub token: Uuid,
    /// Lifetime of the backend session in seconds, when known.
    pub expires_in: Option<u64>,
    #[schema(value_type = Object)]
    pub profile: UserProfile,
}

/// Sign in with email and password.
///
/// Requires an active CEA license valid today. The combined profile is
/// loaded and cached as the snapshot for later fallback.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Credentials rejected", body = crate::error::ErrorBody),
        (status = 403, description = "No valid CEA license", body = crate::error::ErrorBody),
        (status = 503, description = "Backend not configured", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let backend = require_backend(&state)?;

    let licensed = backend
        .sign_in_licensed(req.email.trim(), &req.password, state.today())
        .await?;
    let token = licensed.session.access_token.clone();

    let profile = match backend.load_profile(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "profile load failed at sign-in; using license only");
            UserProfile::combine(&licensed.session.user, None, Some(licensed.license), false)
        }
    };

    let now = Utc::now();
    let purged = state.purge_expired_sessions(now);
    if purged > 0 {
        tracing::debug!(purged, "expired sessions dropped");
    }

    let session_id = Uuid::new_v4();
    state.sessions.insert(
        session_id,
        SessionRecord {
            user_id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
            backend_token: token,
            created_at: now,
            ttl_secs: state.session_ttl(licensed.session.expires_in),
        },
    );
    state.profiles.insert(*profile.id.as_uuid(), profile.clone());
    tracing::info!(user = %profile.id, role = %profile.role, "session opened");

    Ok(Json(LoginResponse {
        token: session_id,
        expires_in: licensed.session.expires_in,
        profile,
    }))
}

/// End the session. Backend sign-out is best effort; the local session,
/// the profile snapshot and the caller's wizards are always dropped.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, caller: CallerIdentity) -> StatusCode {
    if let Some(backend) = state.backend.as_ref() {
        if let Err(e) = backend.auth().sign_out(&caller.backend_token).await {
            tracing::warn!(error = %e, "backend sign-out failed");
        }
    }
    state.sessions.remove(&caller.session_id);
    state.profiles.remove(caller.user_id.as_uuid());
    let wizards = state.drop_wizards_of(caller.user_id);
    tracing::info!(user = %caller.user_id, wizards, "session closed");
    StatusCode::NO_CONTENT
}
