//! # File Session Store
//!
//! Persists the session keys in a small TOML file between CLI runs.
//!
//! ## File Format
//! ```toml
//! # session.toml (mode 0600 on Unix)
//! token = "fake-jwt-token"
//! userRole = "moderador"
//! username = "ana"
//! saved_at = "2026-10-19T09:30:00Z"
//! ```
//!
//! Every write rewrites the whole file through a temporary file and a
//! rename, and `Session::save` is a single write. Clearing the session
//! deletes it.
//! A corrupt file reads as an empty session rather than an error, so a
//! broken file never locks the user out of `login`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use biblio_core::{SessionKey, SessionStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors writing the session file.
#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("Failed to write session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk shape of the session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(rename = "userRole", default, skip_serializing_if = "Option::is_none")]
    user_role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

impl SessionFile {
    fn slot(&mut self, key: SessionKey) -> &mut Option<String> {
        match key {
            SessionKey::Token => &mut self.token,
            SessionKey::UserRole => &mut self.user_role,
            SessionKey::Username => &mut self.username,
        }
    }

    fn value(&self, key: SessionKey) -> Option<&String> {
        match key {
            SessionKey::Token => self.token.as_ref(),
            SessionKey::UserRole => self.user_role.as_ref(),
            SessionKey::Username => self.username.as_ref(),
        }
    }

    fn is_empty(&self) -> bool {
        SessionKey::ALL.iter().all(|key| self.value(*key).is_none())
    }
}

/// A [`SessionStore`] backed by a TOML file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: SessionFile,
}

impl FileSessionStore {
    /// Opens the store at `path`, reading the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = read_state(&path);
        FileSessionStore { path, state }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the session was last written, if known.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.state.saved_at
    }

    fn persist(&mut self) -> Result<(), SessionFileError> {
        if self.state.is_empty() {
            return self.delete_file();
        }

        self.state.saved_at = Some(Utc::now());
        let contents = toml::to_string_pretty(&self.state)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, contents).map_err(|source| self.io_error(source))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&staging, permissions).map_err(|source| self.io_error(source))?;
        }

        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))?;

        debug!(path = ?self.path, "Session file written");
        Ok(())
    }

    fn delete_file(&mut self) -> Result<(), SessionFileError> {
        self.state = SessionFile::default();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Session file removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> SessionFileError {
        SessionFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn read_state(path: &Path) -> SessionFile {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return SessionFile::default(),
        Err(err) => {
            warn!(?path, error = %err, "Cannot read session file, starting logged out");
            return SessionFile::default();
        }
    };

    toml::from_str(&contents).unwrap_or_else(|err| {
        warn!(?path, error = %err, "Corrupt session file, starting logged out");
        SessionFile::default()
    })
}

impl SessionStore for FileSessionStore {
    type Error = SessionFileError;

    fn get(&self, key: SessionKey) -> Option<String> {
        self.state.value(key).cloned()
    }

    fn set(&mut self, key: SessionKey, value: &str) -> Result<(), Self::Error> {
        self.set_all(&[(key, Some(value))])
    }

    fn remove(&mut self, key: SessionKey) -> Result<(), Self::Error> {
        self.set_all(&[(key, None)])
    }

    /// One file write; on failure the in-memory state is rolled back.
    fn set_all(&mut self, entries: &[(SessionKey, Option<&str>)]) -> Result<(), Self::Error> {
        let previous = self.state.clone();
        for (key, value) in entries {
            *self.state.slot(*key) = value.map(str::to_string);
        }

        let result = self.persist();
        if result.is_err() {
            self.state = previous;
        }
        result
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.delete_file()
    }
}
