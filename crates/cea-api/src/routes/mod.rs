//! Route modules, one per API area.

pub mod auth;
pub mod cpd;
pub mod dashboard;
pub mod forms;

use cea_backend::BackendClient;

use crate::error::AppError;
use crate::state::AppState;

/// The backend client, or 503 when it is not configured.
pub(crate) fn require_backend(state: &AppState) -> Result<&BackendClient, AppError> {
    state.backend.as_ref().ok_or_else(|| {
        AppError::service_unavailable(
            "backend not configured. Set CEA_BACKEND_URL and CEA_BACKEND_ANON_KEY.",
        )
    })
}
