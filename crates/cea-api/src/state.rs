//! # Application State
//!
//! Shared state for the Axum application, passed to handlers via `State`.
//!
//! ## Architecture
//!
//! Persistent data (profiles, licenses, CPD records, counts) lives in the
//! hosted backend and is reached through `cea-backend`. AppState holds only
//! what this service owns:
//! - **Sessions**: API session id → backend token and caller identity.
//! - **Profile snapshots**: last combined profile per user, served when
//!   the backend is unreachable.
//! - **Wizard sessions**: in-progress transaction paperwork.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use cea_backend::{AccessToken, BackendClient};
use cea_core::{Role, UserId, UserProfile};
use cea_forms::Wizard;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Mutate a value in place; `None` if absent.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Read-validate-update under one write lock.
    ///
    /// `None` if the value doesn't exist, otherwise the closure's result.
    pub fn try_update<R, E>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> Result<R, E>) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Keep only the values for which `keep` returns true; returns how many
    /// were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, value| keep(value));
        before - guard.len()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Owned Records ------------------------------------------------------------

/// A signed-in API session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    /// Backend access token used for every backend call of this session.
    pub backend_token: AccessToken,
    pub created_at: DateTime<Utc>,
    /// Lifetime from `created_at`, in seconds.
    pub ttl_secs: u64,
}

impl SessionRecord {
    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(ttl)
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// A wizard owned by one user.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub id: Uuid,
    pub owner: UserId,
    pub wizard: Wizard,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Configuration ------------------------------------------------------------

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Upper bound on an API session's lifetime. The backend token's own
    /// `expires_in` wins when shorter.
    pub session_ttl_secs: u64,
}

/// Default session lifetime: one hour, matching the backend token.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

// -- AppState -----------------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Absent when `CEA_BACKEND_*` is not configured; backend routes
    /// answer 503.
    pub backend: Option<BackendClient>,
    pub sessions: Store<SessionRecord>,
    /// Keyed by user id.
    pub profiles: Store<UserProfile>,
    pub wizards: Store<WizardSession>,
}

impl AppState {
    /// State with default config and no backend.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    pub fn with_config(config: AppConfig, backend: Option<BackendClient>) -> Self {
        Self {
            config,
            backend,
            sessions: Store::new(),
            profiles: Store::new(),
            wizards: Store::new(),
        }
    }

    /// Session lifetime for a backend token valid for `expires_in` seconds.
    pub fn session_ttl(&self, expires_in: Option<u64>) -> u64 {
        match expires_in {
            Some(backend) => backend.min(self.config.session_ttl_secs),
            None => self.config.session_ttl_secs,
        }
    }

    /// Drop every session past its lifetime, returning how many went.
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> usize {
        self.sessions.retain(|session| !session.is_expired(now))
    }

    /// Drop the wizards owned by `owner`, returning how many went.
    pub fn drop_wizards_of(&self, owner: UserId) -> usize {
        self.wizards.retain(|wizard| wizard.owner != owner)
    }

    /// Today's date in the server's local time zone.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_update_runs_under_one_lock() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        let result: Option<Result<u32, &str>> = store.try_update(&id, |v| {
            *v += 1;
            Ok(*v)
        });
        assert_eq!(result, Some(Ok(2)));
        assert_eq!(store.try_update::<(), ()>(&Uuid::new_v4(), |_| Ok(())), None);
    }

    #[test]
    fn clones_share_data() {
        let store: Store<&'static str> = Store::new();
        let other = store.clone();
        let id = Uuid::new_v4();
        store.insert(id, "x");
        assert_eq!(other.get(&id), Some("x"));
        assert_eq!(other.remove(&id), Some("x"));
        assert!(store.is_empty());
    }

    #[test]
    fn retain_reports_dropped_count() {
        let store: Store<u32> = Store::new();
        for n in 0..5 {
            store.insert(Uuid::new_v4(), n);
        }
        assert_eq!(store.retain(|n| n % 2 == 0), 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.retain(|_| true), 0);
    }

    fn session(created_at: DateTime<Utc>, ttl_secs: u64) -> SessionRecord {
        SessionRecord {
            user_id: UserId::new(),
            email: "agent@agency.sg".into(),
            role: Role::Agent,
            backend_token: AccessToken::new("backend"),
            created_at,
            ttl_secs,
        }
    }

    #[test]
    fn session_expires_after_ttl() {
        let opened = Utc::now();
        let record = session(opened, 60);
        assert!(!record.is_expired(opened));
        assert!(!record.is_expired(opened + chrono::Duration::seconds(59)));
        assert!(record.is_expired(opened + chrono::Duration::seconds(60)));
        assert!(session(opened, 0).is_expired(opened));
        assert!(!session(opened, u64::MAX).is_expired(opened + chrono::Duration::days(3650)));
    }

    #[test]
    fn session_ttl_takes_the_shorter_bound() {
        let state = AppState::new();
        assert_eq!(state.session_ttl(None), DEFAULT_SESSION_TTL_SECS);
        assert_eq!(state.session_ttl(Some(600)), 600);
        assert_eq!(state.session_ttl(Some(86_400)), DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    fn purge_drops_only_expired_sessions() {
        let state = AppState::new();
        let now = Utc::now();
        state.sessions.insert(Uuid::new_v4(), session(now - chrono::Duration::hours(2), 3600));
        let live = Uuid::new_v4();
        state.sessions.insert(live, session(now, 3600));
        assert_eq!(state.purge_expired_sessions(now), 1);
        assert!(state.sessions.get(&live).is_some());
    }

    #[test]
    fn drop_wizards_of_leaves_other_owners() {
        let state = AppState::new();
        let (mine, theirs) = (UserId::new(), UserId::new());
        for owner in [mine, mine, theirs] {
            let id = Uuid::new_v4();
            state.wizards.insert(
                id,
                WizardSession {
                    id,
                    owner,
                    wizard: Wizard::new(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
            );
        }
        assert_eq!(state.drop_wizards_of(mine), 2);
        assert_eq!(state.wizards.len(), 1);
    }
}
