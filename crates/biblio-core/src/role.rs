//! # Roles and Permissions
//!
//! The three catalog roles and what each may do.
//!
//! ## Permission Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Role × Action                                       │
//! │                                                                         │
//! │                    add        edit       delete                         │
//! │  admin             ✅         ✅         ✅                              │
//! │  moderador         ✅         ✅         ❌                              │
//! │  usuario           ❌         ❌         ❌                              │
//! │                                                                         │
//! │  Listing and searching need only an authenticated session.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Role::permits` is one exhaustive `match`: adding a role or an action
//! does not compile until the table above is extended.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::FieldError;

// =============================================================================
// Role
// =============================================================================

/// A catalog role.
///
/// Serialized with the backend's wire values (`admin`, `moderador`,
/// `usuario`). Anything unknown resolves to [`Role::User`] when read from a
/// session, and to [`FieldError::InvalidRole`] when typed in a login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    /// Full control, including deletion.
    #[serde(rename = "admin")]
    Admin,

    /// May add and edit, never delete.
    #[serde(rename = "moderador", alias = "moderator")]
    Moderator,

    /// Read-only.
    #[default]
    #[serde(rename = "usuario", alias = "user")]
    User,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Moderator, Role::User];

    /// Returns the backend wire value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderador",
            Role::User => "usuario",
        }
    }

    /// Returns the human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Moderator => "Moderator",
            Role::User => "User",
        }
    }

    /// Returns true if this role may perform `action`.
    pub const fn permits(&self, action: Action) -> bool {
        match (self, action) {
            (Role::Admin, Action::Add | Action::Edit | Action::Delete) => true,
            (Role::Moderator, Action::Add | Action::Edit) => true,
            (Role::Moderator, Action::Delete) => false,
            (Role::User, Action::Add | Action::Edit | Action::Delete) => false,
        }
    }

    /// Returns the actions this role may perform, in table order.
    pub fn permitted_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.permits(*a))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrador" | "administrator" => Ok(Role::Admin),
            "moderador" | "moderator" => Ok(Role::Moderator),
            "usuario" | "user" => Ok(Role::User),
            _ => Err(FieldError::InvalidRole {
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// A catalog mutation subject to role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Add, Action::Edit, Action::Delete];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
