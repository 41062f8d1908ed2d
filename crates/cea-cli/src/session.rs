//! Local session file.
//!
//! A signed-in session is kept as `{access_token, profile, saved_at}` JSON,
//! by default at `$HOME/.cea/session.json`. On Unix the file is opened
//! with mode 0600 before the token is written.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cea_backend::AccessToken;
use cea_core::UserProfile;

/// What is persisted between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: AccessToken,
    /// Profile snapshot from the last successful load.
    pub profile: UserProfile,
    pub saved_at: DateTime<Utc>,
}

/// Handle on the session file.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.cea/session.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var_os("HOME").context("HOME is not set; pass --session-file")?;
        Ok(PathBuf::from(home).join(".cea").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, `None` when there is no file.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading session file {}", self.path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("parsing session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// The stored session, or an error telling the user to sign in.
    pub fn require(&self) -> Result<StoredSession> {
        self.load()?
            .context("not signed in; run `cea login` first")
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(session).context("serializing session")?;
        let mut file = open_private(&self.path)?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing session file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("removing session file {}", self.path.display())),
        }
    }
}

/// Open for writing with owner-only access before any byte lands.
///
/// A new file is created 0600. An existing file is tightened to 0600 and
/// then truncated.
#[cfg(unix)]
fn open_private(path: &Path) -> Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("opening session file {}", path.display()))?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restricting permissions of {}", path.display()))?;
    file.set_len(0)
        .with_context(|| format!("truncating session file {}", path.display()))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening session file {}", path.display()))
}
