//! # Transaction Forms
//!
//! Workflow catalogue and wizard sessions.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/v1/forms/workflows` | all transaction workflows |
//! | GET | `/v1/forms/workflows/:transaction_type` | one workflow |
//! | GET | `/v1/forms/schema/:category` | field schema of a data category |
//! | POST | `/v1/forms/sessions` | start a wizard |
//! | GET | `/v1/forms/sessions/:id` | current view |
//! | POST | `/v1/forms/sessions/:id/select` | choose the transaction type |
//! | PUT | `/v1/forms/sessions/:id/data` | merge master data |
//! | POST | `/v1/forms/sessions/:id/next` | validate and advance |
//! | POST | `/v1/forms/sessions/:id/previous` | step back |
//! | POST | `/v1/forms/sessions/:id/optional/:form_id` | generate an optional form |
//! | POST | `/v1/forms/sessions/:id/restart` | start over |
//!
//! A wizard session is visible only to the user who created it.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use cea_forms::catalogue::display_name;
use cea_forms::{DataCategory, FieldSpec, TransactionType, Wizard, WizardView, Workflow};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, WizardSession};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/forms/workflows", get(list_workflows))
        .route("/v1/forms/workflows/:transaction_type", get(get_workflow))
        .route("/v1/forms/schema/:category", get(category_schema))
        .route("/v1/forms/sessions", post(create_session))
        .route("/v1/forms/sessions/:id", get(get_session))
        .route("/v1/forms/sessions/:id/select", post(select_transaction))
        .route("/v1/forms/sessions/:id/data", put(update_data))
        .route("/v1/forms/sessions/:id/next", post(next_step))
        .route("/v1/forms/sessions/:id/previous", post(previous_step))
        .route("/v1/forms/sessions/:id/optional/:form_id", post(generate_optional))
        .route("/v1/forms/sessions/:id/restart", post(restart))
}

// -- DTOs ---------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct FormRef {
    pub id: String,
    pub name: String,
}

impl FormRef {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: display_name(id).to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkflowResponse {
    pub transaction_type: String,
    pub name: String,
    pub required_forms: Vec<FormRef>,
    pub optional_forms: Vec<FormRef>,
    pub data_categories: Vec<String>,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(w: &Workflow) -> Self {
        Self {
            transaction_type: w.transaction_type.as_str().to_string(),
            name: w.name.to_string(),
            required_forms: w.required_forms.iter().map(|f| FormRef::new(f)).collect(),
            optional_forms: w.optional_forms.iter().map(|f| FormRef::new(f)).collect(),
            data_categories: w.data_categories.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategorySchemaResponse {
    pub category: String,
    pub label: String,
    #[schema(value_type = Vec<Object>)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    #[schema(value_type = Object)]
    pub view: WizardView,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    /// One of the six transaction type identifiers, e.g. `hdb_resale`.
    pub transaction_type: String,
}

impl Validate for SelectRequest {
    fn validate(&self) -> Result<(), String> {
        self.transaction_type
            .parse::<TransactionType>()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DataRequest {
    /// Master data entries keyed `{category}_{field}`.
    pub entries: BTreeMap<String, String>,
}

impl Validate for DataRequest {
    fn validate(&self) -> Result<(), String> {
        if self.entries.keys().any(|k| k.trim().is_empty()) {
            return Err("master data keys must not be empty".into());
        }
        Ok(())
    }
}

// -- Catalogue ----------------------------------------------------------------

/// All transaction workflows.
#[utoipa::path(
    get,
    path = "/v1/forms/workflows",
    responses((status = 200, description = "Workflows", body = Vec<WorkflowResponse>)),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn list_workflows() -> Json<Vec<WorkflowResponse>> {
    Json(Workflow::all().iter().map(WorkflowResponse::from).collect())
}

/// One transaction workflow.
#[utoipa::path(
    get,
    path = "/v1/forms/workflows/{transaction_type}",
    params(("transaction_type" = String, Path, description = "Transaction type identifier")),
    responses(
        (status = 200, description = "Workflow", body = WorkflowResponse),
        (status = 404, description = "Unknown transaction type", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn get_workflow(Path(transaction_type): Path<String>) -> Result<Json<WorkflowResponse>, AppError> {
    let transaction_type: TransactionType = transaction_type.parse()?;
    Ok(Json(transaction_type.workflow().into()))
}

/// Field schema of a data category.
#[utoipa::path(
    get,
    path = "/v1/forms/schema/{category}",
    params(("category" = String, Path, description = "Data category identifier")),
    responses(
        (status = 200, description = "Fields", body = CategorySchemaResponse),
        (status = 404, description = "Unknown category", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn category_schema(Path(category): Path<String>) -> Result<Json<CategorySchemaResponse>, AppError> {
    let category: DataCategory = category.parse()?;
    Ok(Json(CategorySchemaResponse {
        category: category.as_str().to_string(),
        label: category.label(),
        fields: category.field_specs(),
    }))
}

// -- Wizard sessions ----------------------------------------------------------

/// Apply `f` to the caller's wizard and return the resulting view.
fn with_wizard(
    state: &AppState,
    caller: &CallerIdentity,
    id: Uuid,
    f: impl FnOnce(&mut Wizard) -> Result<(), AppError>,
) -> Result<Json<SessionResponse>, AppError> {
    let not_found = || AppError::NotFound(format!("wizard session {id}"));
    state
        .wizards
        .try_update(&id, |session| {
            if session.owner != caller.user_id {
                return Err(not_found());
            }
            f(&mut session.wizard)?;
            session.updated_at = Utc::now();
            Ok(SessionResponse {
                id,
                view: session.wizard.view(),
            })
        })
        .unwrap_or_else(|| Err(not_found()))
        .map(Json)
}

/// Start a wizard session at the transaction-type step.
#[utoipa::path(
    post,
    path = "/v1/forms/sessions",
    responses((status = 201, description = "Session created", body = SessionResponse)),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn create_session(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> (StatusCode, Json<SessionResponse>) {
    let now = Utc::now();
    let session = WizardSession {
        id: Uuid::new_v4(),
        owner: caller.user_id,
        wizard: Wizard::new(),
        created_at: now,
        updated_at: now,
    };
    let response = SessionResponse {
        id: session.id,
        view: session.wizard.view(),
    };
    state.wizards.insert(session.id, session);
    tracing::debug!(session = %response.id, user = %caller.user_id, "wizard session started");
    (StatusCode::CREATED, Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/forms/sessions/{id}",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Current view", body = SessionResponse),
        (status = 404, description = "No such session", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn get_session(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_wizard(&state, &caller, id, |_| Ok(()))
}

/// Choose the transaction type and enter the first data step.
#[utoipa::path(
    post,
    path = "/v1/forms/sessions/{id}/select",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = SelectRequest,
    responses(
        (status = 200, description = "First data step", body = SessionResponse),
        (status = 409, description = "Not at the transaction-type step", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn select_transaction(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let transaction_type: TransactionType = req.transaction_type.parse()?;
    with_wizard(&state, &caller, id, |w| Ok(w.select(transaction_type)?))
}

/// Merge master data entries. Accepted at any step.
#[utoipa::path(
    put,
    path = "/v1/forms/sessions/{id}/data",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    request_body = DataRequest,
    responses((status = 200, description = "Updated view", body = SessionResponse)),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn update_data(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<DataRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    with_wizard(&state, &caller, id, |w| {
        w.update_data(req.entries);
        Ok(())
    })
}

/// Validate the current category and advance; the last step generates the
/// required forms.
#[utoipa::path(
    post,
    path = "/v1/forms/sessions/{id}/next",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses(
        (status = 200, description = "Advanced", body = SessionResponse),
        (status = 422, description = "Required fields missing", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn next_step(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_wizard(&state, &caller, id, |w| {
        w.next()?;
        Ok(())
    })
}

#[utoipa::path(
    post,
    path = "/v1/forms/sessions/{id}/previous",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses((status = 200, description = "Stepped back", body = SessionResponse)),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn previous_step(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_wizard(&state, &caller, id, |w| {
        w.previous()?;
        Ok(())
    })
}

#[utoipa::path(
    post,
    path = "/v1/forms/sessions/{id}/optional/{form_id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session id"),
        ("form_id" = String, Path, description = "Optional form of the workflow"),
    ),
    responses(
        (status = 200, description = "Form generated", body = SessionResponse),
        (status = 422, description = "Not an optional form of the workflow", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn generate_optional(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, form_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionResponse>, AppError> {
    with_wizard(&state, &caller, id, |w| Ok(w.generate_optional(&form_id)?))
}

#[utoipa::path(
    post,
    path = "/v1/forms/sessions/{id}/restart",
    params(("id" = Uuid, Path, description = "Wizard session id")),
    responses((status = 200, description = "Back to the start", body = SessionResponse)),
    security(("bearer" = [])),
    tag = "forms"
)]
pub async fn restart(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_wizard(&state, &caller, id, |w| {
        w.restart();
        Ok(())
    })
}
