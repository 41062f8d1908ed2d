//! # CPD Compliance Routes
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/v1/cpd/compliance?year=` | evaluate, write back the stored flag |
//! | GET | `/v1/cpd/records?year=` | completed records of the year |
//! | POST | `/v1/cpd/records` | add a record |
//! | POST | `/v1/cpd/records/:id/approve` | KEO approval (role ≥ keo) |
//!
//! `year` defaults to the current calendar year.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use cea_compliance::{approve, build_record, evaluate, is_pending_keo_approval, progress, ComplianceReport, CpdEntryInput, Progress};
use cea_core::{CpdRecord, RecordId, Role};

use crate::auth::{require_role, CallerIdentity};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::require_backend;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/cpd/compliance", get(compliance))
        .route("/v1/cpd/records", get(list_records).post(add_record))
        .route("/v1/cpd/records/:id/approve", post(approve_record))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Compliance year; defaults to the current year.
    pub year: Option<i32>,
}

impl YearQuery {
    fn resolve(&self, state: &AppState) -> i32 {
        self.year.unwrap_or_else(|| state.today().year())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentProgressView {
    pub key: String,
    #[schema(value_type = Object)]
    pub progress: Progress,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplianceResponse {
    #[schema(value_type = Object)]
    pub report: ComplianceReport,
    #[schema(value_type = Object)]
    pub overall_progress: Progress,
    pub component_progress: Vec<ComponentProgressView>,
    /// Whether the stored compliance flag was changed by this evaluation.
    pub status_updated: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordView {
    #[schema(value_type = Object)]
    pub record: CpdRecord,
    pub pending_keo_approval: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordsResponse {
    pub year: i32,
    pub records: Vec<RecordView>,
}

/// Evaluate the caller's CPD compliance for a year.
///
/// When the stored flag on the caller's `users` row differs from the
/// result it is updated. A failed update is logged, not returned.
#[utoipa::path(
    get,
    path = "/v1/cpd/compliance",
    params(YearQuery),
    responses((status = 200, description = "Compliance report", body = ComplianceResponse)),
    security(("bearer" = [])),
    tag = "cpd"
)]
pub async fn compliance(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<YearQuery>,
) -> Result<Json<ComplianceResponse>, AppError> {
    let backend = require_backend(&state)?;
    let year = query.resolve(&state);
    let token = &caller.backend_token;

    let records = backend.cpd().completed_for_year(token, caller.user_id, year).await?;
    let report = evaluate(year, &records);

    let stored = match backend.profiles().compliance_status(token, caller.user_id).await {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            tracing::warn!(user = %caller.user_id, error = %e, "could not read stored compliance flag");
            !report.compliant
        }
    };

    let mut status_updated = false;
    if stored != report.compliant {
        match backend
            .profiles()
            .set_compliance_status(token, caller.user_id, report.compliant)
            .await
        {
            Ok(()) => {
                status_updated = true;
                state.profiles.update(caller.user_id.as_uuid(), |p| {
                    p.cpd_compliance_status = report.compliant;
                });
            }
            Err(e) => tracing::warn!(user = %caller.user_id, error = %e, "compliance write-back failed"),
        }
    }

    let component_progress = report
        .breakdown
        .iter()
        .map(|c| ComponentProgressView {
            key: c.key.clone(),
            progress: progress(c.completed, c.required),
        })
        .collect();

    Ok(Json(ComplianceResponse {
        overall_progress: progress(report.total_completed, report.required_total),
        component_progress,
        status_updated,
        report,
    }))
}

/// Completed CPD records of the caller for a year, newest first.
#[utoipa::path(
    get,
    path = "/v1/cpd/records",
    params(YearQuery),
    responses((status = 200, description = "Records", body = RecordsResponse)),
    security(("bearer" = [])),
    tag = "cpd"
)]
pub async fn list_records(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<YearQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let backend = require_backend(&state)?;
    let year = query.resolve(&state);
    let records = backend
        .cpd()
        .completed_for_year(&caller.backend_token, caller.user_id, year)
        .await?
        .into_iter()
        .map(|record| RecordView {
            pending_keo_approval: is_pending_keo_approval(&record),
            record,
        })
        .collect();
    Ok(Json(RecordsResponse { year, records }))
}

/// Add a CPD record for the caller.
///
/// Fields follow the framework of the completion date's year; problems are
/// reported per field in `error.details.fields`.
#[utoipa::path(
    post,
    path = "/v1/cpd/records",
    request_body(content = Object, description = "CPD entry form"),
    responses(
        (status = 201, description = "Stored record", body = Object),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "cpd"
)]
pub async fn add_record(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CpdEntryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CpdRecord>), AppError> {
    let input = extract_json(body)?;
    let row = build_record(caller.user_id, &input)?;
    let backend = require_backend(&state)?;
    let stored = backend.cpd().insert(&caller.backend_token, &row).await?;
    tracing::info!(
        user = %caller.user_id,
        year = row.compliance_year,
        category = row.cpd_category.as_deref().unwrap_or("-"),
        "CPD record added"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Approve a self-directed learning record. Requires role `keo` or above.
#[utoipa::path(
    post,
    path = "/v1/cpd/records/{id}/approve",
    params(("id" = Uuid, Path, description = "CPD record id")),
    responses(
        (status = 200, description = "Approved record", body = Object),
        (status = 403, description = "Caller is not a KEO", body = crate::error::ErrorBody),
        (status = 404, description = "No such record", body = crate::error::ErrorBody),
        (status = 409, description = "Not pending approval", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "cpd"
)]
pub async fn approve_record(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CpdRecord>, AppError> {
    require_role(&caller, Role::Keo)?;
    let backend = require_backend(&state)?;
    let id = RecordId(id);
    let token = &caller.backend_token;

    let record = backend
        .cpd()
        .get(token, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CPD record {id}")))?;
    let patch = approve(&record)?;
    let updated = backend.cpd().set_keo_approved(token, id, patch.keo_approved).await?;
    tracing::info!(record = %id, keo = %caller.user_id, "self-directed learning approved");
    Ok(Json(updated))
}
