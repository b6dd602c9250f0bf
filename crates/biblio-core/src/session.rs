//! # Session Resolver
//!
//! Derives the current identity from persisted session state and answers
//! permission questions about it.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  login OK ──► Session::save(&mut store)                                │
//! │                 token     = "…"                                         │
//! │                 userRole  = "moderador"                                 │
//! │                 username  = "ana"                                       │
//! │                                                                         │
//! │  any screen ──► Session::load(&store) ──► can_add() / can_delete()     │
//! │                                                                         │
//! │  logout / 401 ──► Session::clear(&mut store)  (all three keys)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Ambient State
//! The store is always passed in. Nothing here reads globals, so tests use
//! [`MemorySessionStore`] and the client uses a file-backed store.
//!
//! ## Degradation
//! Loading never fails: a missing or blank token means "not authenticated",
//! and a missing or unknown role means [`Role::User`].

use std::collections::HashMap;
use std::convert::Infallible;

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::role::{Action, Role};

// =============================================================================
// Session Keys
// =============================================================================

/// Keys of the persisted session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    UserRole,
    Username,
}

impl SessionKey {
    /// Every key; logout removes all of them together.
    pub const ALL: [SessionKey; 3] = [SessionKey::Token, SessionKey::UserRole, SessionKey::Username];

    /// Returns the storage key name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::UserRole => "userRole",
            SessionKey::Username => "username",
        }
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// A key-value store holding the session between runs.
///
/// Reads are infallible by contract: an unreadable value is an absent value.
/// Writes may fail (a file store can hit the disk).
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&mut self, key: SessionKey, value: &str) -> Result<(), Self::Error>;

    fn remove(&mut self, key: SessionKey) -> Result<(), Self::Error>;

    /// Applies several changes together; `None` removes the key.
    ///
    /// Stores that persist on every write override this so the changes
    /// land in one write, or not at all.
    fn set_all(&mut self, entries: &[(SessionKey, Option<&str>)]) -> Result<(), Self::Error> {
        for (key, value) in entries {
            match value {
                Some(value) => self.set(*key, value)?,
                None => self.remove(*key)?,
            }
        }
        Ok(())
    }

    /// Removes every session key.
    fn clear(&mut self) -> Result<(), Self::Error> {
        for key in SessionKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<SessionKey, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    type Error = Infallible;

    fn get(&self, key: SessionKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SessionKey, value: &str) -> Result<(), Self::Error> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: SessionKey) -> Result<(), Self::Error> {
        self.values.remove(&key);
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// The resolved client session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct Session {
    /// Opaque bearer token; `None` when logged out.
    pub token: Option<String>,

    /// Role chosen at login.
    pub role: Role,

    /// Display name returned by the backend.
    pub username: String,
}

impl Session {
    /// Creates an authenticated session.
    pub fn new(token: impl Into<String>, role: Role, username: impl Into<String>) -> Self {
        Session {
            token: Some(token.into()),
            role,
            username: username.into(),
        }
    }

    /// The logged-out session: no token, least-privileged role.
    pub fn anonymous() -> Self {
        Session::default()
    }

    /// Reads the session from `store`, degrading instead of failing.
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Self {
        let token = store
            .get(SessionKey::Token)
            .filter(|t| !t.trim().is_empty());

        let role = store
            .get(SessionKey::UserRole)
            .and_then(|r| r.parse::<Role>().ok())
            .unwrap_or_default();

        let username = store.get(SessionKey::Username).unwrap_or_default();

        Session {
            token,
            role,
            username,
        }
    }

    /// Writes all three keys to `store` in one [`SessionStore::set_all`].
    pub fn save<S: SessionStore + ?Sized>(&self, store: &mut S) -> Result<(), S::Error> {
        store.set_all(&[
            (SessionKey::Token, self.token.as_deref()),
            (SessionKey::UserRole, Some(self.role.as_str())),
            (SessionKey::Username, Some(self.username.as_str())),
        ])
    }

    /// Removes all three keys from `store`.
    pub fn clear<S: SessionStore + ?Sized>(store: &mut S) -> Result<(), S::Error> {
        store.clear()
    }

    // =========================================================================
    // Resolver
    // =========================================================================

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn can(&self, action: Action) -> bool {
        self.role.permits(action)
    }

    pub fn can_add(&self) -> bool {
        self.can(Action::Add)
    }

    pub fn can_edit(&self) -> bool {
        self.can(Action::Edit)
    }

    pub fn can_delete(&self) -> bool {
        self.can(Action::Delete)
    }

    /// Like [`Session::can`], but as an error for `?` call sites.
    pub fn authorize(&self, action: Action) -> CoreResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                role: self.role,
                action,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
