//! # cea-api: HTTP Service for the CEA Agent Desk
//!
//! Fronts the hosted backend for licensed estate agents: sign-in gated on
//! an active CEA license, the profile dashboard, CPD compliance tracking,
//! and the transaction forms wizard.
//!
//! ## API Surface
//!
//! | Prefix | Module | Auth |
//! |--------|--------|------|
//! | `/health/*` | this crate | none |
//! | `/openapi.json` | [`openapi`] | none |
//! | `/v1/auth/login` | [`routes::auth`] | none |
//! | `/v1/auth/logout` | [`routes::auth`] | session |
//! | `/v1/me`, `/v1/dashboard` | [`routes::dashboard`] | session |
//! | `/v1/cpd/*` | [`routes::cpd`] | session |
//! | `/v1/forms/*` | [`routes::forms`] | session |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
///
/// Health probes, the OpenAPI document and login sit outside the auth
/// middleware.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::auth::router())
        .merge(routes::dashboard::router())
        .merge(routes::cpd::router())
        .merge(routes::forms::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(state.sessions.clone()));

    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::auth::public_router())
        .merge(openapi::router());

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
