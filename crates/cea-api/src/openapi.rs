//! # OpenAPI Document
//!
//! Collects the utoipa-annotated handlers into one document served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CEA Agent Desk API",
        description = "License-gated sessions, CPD compliance tracking and transaction paperwork for licensed estate agents.",
        license(name = "BUSL-1.1")
    ),
    paths(
        // Auth
        crate::routes::auth::login,
        crate::routes::auth::logout,
        // Profile
        crate::routes::dashboard::me,
        crate::routes::dashboard::dashboard,
        // CPD
        crate::routes::cpd::compliance,
        crate::routes::cpd::list_records,
        crate::routes::cpd::add_record,
        crate::routes::cpd::approve_record,
        // Forms
        crate::routes::forms::list_workflows,
        crate::routes::forms::get_workflow,
        crate::routes::forms::category_schema,
        crate::routes::forms::create_session,
        crate::routes::forms::get_session,
        crate::routes::forms::select_transaction,
        crate::routes::forms::update_data,
        crate::routes::forms::next_step,
        crate::routes::forms::previous_step,
        crate::routes::forms::generate_optional,
        crate::routes::forms::restart,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::LoginResponse,
        crate::routes::dashboard::ProfileResponse,
        crate::routes::dashboard::DashboardStats,
        crate::routes::dashboard::DashboardResponse,
        crate::routes::cpd::ComplianceResponse,
        crate::routes::cpd::ComponentProgressView,
        crate::routes::cpd::RecordView,
        crate::routes::cpd::RecordsResponse,
        crate::routes::forms::FormRef,
        crate::routes::forms::WorkflowResponse,
        crate::routes::forms::CategorySchemaResponse,
        crate::routes::forms::SessionResponse,
        crate::routes::forms::SelectRequest,
        crate::routes::forms::DataRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Sign-in gated on an active CEA license"),
        (name = "dashboard", description = "Combined profile and dashboard"),
        (name = "cpd", description = "CPD records and compliance"),
        (name = "forms", description = "Transaction workflows and the forms wizard"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
