//! The signed-in state: a bearer token and a snapshot of the user.
//!
//! A [`Session`] is a plain value. [`SessionStore`] hydrates it from disk once
//! at startup and the caller hands it to [`crate::client::ApiClient`], which
//! owns it from then on.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use unicompass_core::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    /// Denormalized for display; the server stays authoritative.
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed persistence for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session. A missing or unreadable file starts signed out.
    pub fn hydrate(&self) -> Session {
        match self.read() {
            Ok(Some(session)) => {
                debug!("Hydrated session from {}", self.path.display());
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!("Ignoring session file {}: {e}", self.path.display());
                Session::default()
            }
        }
    }

    fn read(&self) -> Result<Option<Session>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn persist(&self, session: &Session) -> Result<(), SessionError> {
        if !session.is_authenticated() {
            return self.clear();
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use unicompass_core::Stage;

    fn signed_in() -> Session {
        Session {
            token: Some("0b7c6a9e-7d55-4a6c-9d43-2f0f1a7e3c11".into()),
            user: Some(User {
                id: 7,
                email: "asha@example.com".into(),
                full_name: "Asha Rao".into(),
                is_onboarded: true,
                current_stage: Stage::Shortlisting,
            }),
        }
    }

    #[test]
    fn test_missing_file_hydrates_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.hydrate(), Session::default());
    }

    #[test]
    fn test_persist_then_hydrate() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.persist(&signed_in()).unwrap();
        assert_eq!(store.hydrate(), signed_in());
    }

    #[test]
    fn test_corrupt_file_hydrates_signed_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(!SessionStore::new(path).hydrate().is_authenticated());
    }

    #[test]
    fn test_persisting_a_cleared_session_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.persist(&signed_in()).unwrap();

        let mut session = signed_in();
        session.clear();
        store.persist(&session).unwrap();

        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}
