//! # Profile and Dashboard
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/v1/me` | combined profile, live or cached |
//! | GET | `/v1/dashboard` | profile plus client/property counts |
//!
//! When the backend cannot produce the profile, the snapshot cached at
//! sign-in (or at the last successful load) is served with `cached: true`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use cea_core::UserProfile;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::routes::require_backend;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/me", get(me))
        .route("/v1/dashboard", get(dashboard))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(value_type = Object)]
    pub profile: UserProfile,
    /// Whether `profile` is the cached snapshot rather than a live load.
    pub cached: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub clients: u64,
    pub properties: u64,
    /// Placeholder until transactions are tracked.
    pub transactions: u64,
    pub cpd_compliance: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = Object)]
    pub profile: UserProfile,
    pub cached: bool,
    pub stats: DashboardStats,
}

/// Load the caller's profile, refreshing the snapshot, or fall back to it.
pub(crate) async fn profile_or_snapshot(
    state: &AppState,
    caller: &CallerIdentity,
) -> Result<ProfileResponse, AppError> {
    let backend = require_backend(state)?;
    match backend.load_profile(&caller.backend_token).await {
        Ok(profile) => {
            state.profiles.insert(*caller.user_id.as_uuid(), profile.clone());
            Ok(ProfileResponse { profile, cached: false })
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => match state.profiles.get(caller.user_id.as_uuid()) {
            Some(profile) => {
                tracing::warn!(user = %caller.user_id, error = %e, "serving cached profile snapshot");
                Ok(ProfileResponse { profile, cached: true })
            }
            None => Err(e.into()),
        },
    }
}

/// The caller's combined profile.
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 502, description = "Backend failed and no snapshot exists", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "dashboard"
)]
pub async fn me(State(state): State<AppState>, caller: CallerIdentity) -> Result<Json<ProfileResponse>, AppError> {
    profile_or_snapshot(&state, &caller).await.map(Json)
}

/// Profile and summary counts.
///
/// A table that cannot be counted contributes 0.
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses((status = 200, description = "Dashboard", body = DashboardResponse)),
    security(("bearer" = [])),
    tag = "dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<DashboardResponse>, AppError> {
    let ProfileResponse { profile, cached } = profile_or_snapshot(&state, &caller).await?;
    let backend = require_backend(&state)?;
    let stats = backend.stats();
    let token = &caller.backend_token;

    let (clients, properties) = tokio::join!(stats.count_clients(token), stats.count_properties(token));
    let clients = clients.unwrap_or_else(|e| {
        tracing::warn!(table = "client_profiles", error = %e, "count failed");
        0
    });
    let properties = properties.unwrap_or_else(|e| {
        tracing::warn!(table = "property_profiles", error = %e, "count failed");
        0
    });

    Ok(Json(DashboardResponse {
        stats: DashboardStats {
            clients,
            properties,
            transactions: 0,
            cpd_compliance: profile.cpd_compliance_status,
        },
        profile,
        cached,
    }))
}
