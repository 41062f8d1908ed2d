//! # Session Authentication
//!
//! Login issues an opaque session id (a UUID). Every other `/v1` request
//! presents it as `Authorization: Bearer {session_id}`. The middleware
//! resolves it against the session store and injects a [`CallerIdentity`]
//! into the request extensions; handlers extract it like any other
//! argument. A session past its lifetime is dropped on first use and
//! answers 401.
//!
//! Roles come from the caller's profile row at login and are ordered
//! `agent < team_leader < keo < admin`.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use cea_backend::AccessToken;
use cea_core::{Role, UserId};

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::{SessionRecord, Store};

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    /// Backend token for calls made on the caller's behalf.
    pub backend_token: AccessToken,
}

impl CallerIdentity {
    /// Whether the caller has at least `minimum`.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role.at_least(minimum)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// 403 unless the caller has at least `minimum`.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Resolve the bearer session id and inject the caller's identity.
///
/// The session store is read from the request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(sessions) = request.extensions().get::<Store<SessionRecord>>().cloned() else {
        tracing::error!("session store missing from request extensions");
        return AppError::Internal("session store not configured".into()).into_response();
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let session_id = match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(raw) => match raw.trim().parse::<Uuid>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!("authentication failed: malformed session token");
                    return unauthorized_response("invalid session token");
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return unauthorized_response("authorization header must use Bearer scheme");
            }
        },
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            return unauthorized_response("missing authorization header");
        }
    };

    match sessions.get(&session_id) {
        Some(session) if session.is_expired(chrono::Utc::now()) => {
            sessions.remove(&session_id);
            tracing::warn!(%session_id, user = %session.user_id, "authentication failed: session expired");
            unauthorized_response("session expired")
        }
        Some(session) => {
            request.extensions_mut().insert(CallerIdentity {
                session_id,
                user_id: session.user_id,
                email: session.email,
                role: session.role,
                backend_token: session.backend_token,
            });
            next.run(request).await
        }
        None => {
            tracing::warn!(%session_id, "authentication failed: unknown session");
            unauthorized_response("session not found or signed out")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_app(sessions: Store<SessionRecord>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|caller: CallerIdentity| async move { caller.email }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(sessions))
    }

    fn session(role: Role) -> SessionRecord {
        SessionRecord {
            user_id: UserId::new(),
            email: "agent@agency.sg".into(),
            role,
            backend_token: AccessToken::new("backend"),
            created_at: chrono::Utc::now(),
            ttl_secs: 3600,
        }
    }

    async fn call(app: Router, auth: Option<String>) -> StatusCode {
        let mut req = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            req = req.header("authorization", value);
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn known_session_is_accepted() {
        let sessions = Store::new();
        let id = Uuid::new_v4();
        sessions.insert(id, session(Role::Agent));
        assert_eq!(call(test_app(sessions), Some(format!("Bearer {id}"))).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_dropped() {
        let sessions = Store::new();
        let id = Uuid::new_v4();
        let mut record = session(Role::Agent);
        record.created_at -= chrono::Duration::hours(2);
        sessions.insert(id, record);
        let status = call(test_app(sessions.clone()), Some(format!("Bearer {id}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(sessions.get(&id).is_none());
    }

    #[tokio::test]
    async fn unknown_missing_and_malformed_are_rejected() {
        let sessions = Store::new();
        let app = test_app(sessions);
        let unknown = Some(format!("Bearer {}", Uuid::new_v4()));
        assert_eq!(call(app.clone(), unknown).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call(app.clone(), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call(app.clone(), Some("Bearer nope".into())).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call(app, Some("Basic abc".into())).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn require_role_compares_privilege() {
        let caller = CallerIdentity {
            session_id: Uuid::new_v4(),
            user_id: UserId::new(),
            email: String::new(),
            role: Role::TeamLeader,
            backend_token: AccessToken::new("t"),
        };
        assert!(require_role(&caller, Role::Agent).is_ok());
        assert!(matches!(require_role(&caller, Role::Keo), Err(AppError::Forbidden(_))));
    }
}
