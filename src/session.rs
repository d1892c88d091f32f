//! Persisted session state
//!
//! Holds the access token and the cached user profile, mirrored to a JSON
//! file so a session survives process restarts. The store is the only owner
//! of session state: controllers write to it on login, the API client clears
//! it when the server rejects the token, nothing else touches it.
//!
//! There is no expiry or refresh logic; a token is treated as valid until
//! the server says otherwise.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserProfile;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
struct SessionState {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// File-backed session store
pub struct SessionStore {
    path: PathBuf,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Open the store at `path`, loading any persisted session.
    ///
    /// A missing or unreadable file is not an error: the user is simply
    /// signed out, matching what a cleared browser storage would mean.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(path = ?path, error = %err, "session file unreadable, starting signed out");
                    SessionState::default()
                }
            },
            Err(_) => SessionState::default(),
        };

        Self {
            path,
            state: RwLock::new(state),
        }
    }

    /// Default session file location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("punchcard")
            .join("session.json")
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().access_token.clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.state.read().unwrap().user.clone()
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap();
        state.access_token = Some(token.to_string());
        self.persist(&state)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap();
        state.user = Some(profile.clone());
        self.persist(&state)
    }

    /// Forget both the token and the cached profile and remove the file.
    ///
    /// Infallible: this runs on the unauthorized path where there is nothing
    /// useful to do with a filesystem error beyond logging it.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap();
        *state = SessionState::default();
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = ?self.path, error = %err, "failed to remove session file");
            }
        }
    }

    fn persist(&self, state: &SessionState) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Io {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }
        let raw = serde_json::to_string_pretty(state)
            .map_err(|e| SessionError::Encode(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| SessionError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }
}

/// Errors raised when persisting session state
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("failed to encode session state: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn profile() -> UserProfile {
        serde_json::from_str(
            r#"{"user_id": 1, "email": "a@b.com", "role": "employee", "first_name": "Asha"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_store_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        assert!(store.token().is_none());
        assert!(store.profile().is_none());
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.set_token("t1").unwrap();
        store.set_profile(&profile()).unwrap();

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.token().as_deref(), Some("t1"));
        assert_eq!(reopened.profile().unwrap().role, Role::Employee);
    }

    #[test]
    fn test_clear_forgets_token_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.set_token("t1").unwrap();
        store.set_profile(&profile()).unwrap();
        store.clear();

        assert!(store.token().is_none());
        assert!(store.profile().is_none());
        assert!(!path.exists());

        // And the cleared state is what a fresh open sees
        let reopened = SessionStore::open(&path);
        assert!(reopened.token().is_none());
    }

    #[test]
    fn test_corrupt_file_loads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.token().is_none());
        assert!(store.profile().is_none());
    }
}
