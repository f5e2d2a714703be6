use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::{AppState, CountyState, DosState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    County,
    Dos,
}

/// The only client-side persistence: which dashboard the last login
/// opened, stored as `{"type": "county" | "dos"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: SessionKind,
}

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

    /// A missing or unreadable session file means no session.
    pub fn load(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session file '{}'", self.path.display())
                })
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "session: ignoring malformed file"
                );
                Ok(None)
            }
        }
    }

    pub fn save(&self, kind: SessionKind) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_string(&Session { kind })?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))?;
        info!(kind = ?kind, "session: saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file '{}'", self.path.display())
            }),
        }
    }
}

pub fn initial_state(session: Option<&Session>) -> AppState {
    match session.map(|s| s.kind) {
        Some(SessionKind::County) => AppState::County(CountyState::default()),
        Some(SessionKind::Dos) => AppState::Dos(DosState::default()),
        None => AppState::default(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        SessionStore::new(
            std::env::temp_dir()
                .join(format!("rla_session_test_{suffix}"))
                .join(name),
        )
    }

    #[test]
    fn save_load_clear_cycle() {
        let store = temp_store("session.json");
        assert_eq!(store.load().expect("load"), None);

        store.save(SessionKind::Dos).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        assert_eq!(raw, r#"{"type":"dos"}"#);
        assert_eq!(
            store.load().expect("load"),
            Some(Session {
                kind: SessionKind::Dos
            })
        );

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clear twice");

        if let Some(parent) = store.path().parent() {
            fs::remove_dir_all(parent).expect("cleanup");
        }
    }

    #[test]
    fn malformed_session_is_ignored() {
        let store = temp_store("bad.json");
        store.save(SessionKind::County).expect("save");
        fs::write(store.path(), "{not json").expect("overwrite");
        assert_eq!(store.load().expect("load"), None);
        if let Some(parent) = store.path().parent() {
            fs::remove_dir_all(parent).expect("cleanup");
        }
    }

    #[test]
    fn initial_state_follows_session_type() {
        let county = Session {
            kind: SessionKind::County,
        };
        assert_eq!(initial_state(Some(&county)).kind(), "County");
        assert_eq!(initial_state(None).kind(), "Login");
    }
}
