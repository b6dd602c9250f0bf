//! # Domain Types
//!
//! Records exchanged with the catalog backend.
//!
//! ## Wire Names
//! The backend speaks Spanish field names; Rust code uses English ones.
//! ```text
//! ┌──────────────┬──────────────┐
//! │ Rust field   │ JSON key     │
//! ├──────────────┼──────────────┤
//! │ title        │ titulo       │
//! │ author       │ autor        │
//! │ price        │ precio       │
//! │ role         │ rol          │
//! └──────────────┴──────────────┘
//! ```
//!
//! ## Type Generation
//! Types with `#[derive(TS)]` export TypeScript bindings for any web front
//! end sharing the backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::price::Price;
use crate::role::Role;

// =============================================================================
// Book
// =============================================================================

/// Server-assigned book identifier.
pub type BookId = i64;

/// A book as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Book {
    /// Server-assigned, never changes.
    pub id: BookId,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "autor")]
    pub author: String,

    #[serde(rename = "precio")]
    #[ts(type = "number")]
    pub price: Price,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} by {} ({})", self.id, self.title, self.author, self.price)
    }
}

/// A validated book ready for submission: trimmed text, price in range.
///
/// Only [`crate::validation::validate_book`] builds one from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ValidBook {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "autor")]
    pub author: String,

    #[serde(rename = "precio")]
    #[ts(type = "number")]
    pub price: Price,
}

impl ValidBook {
    /// Pairs this record with a server id.
    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price,
        }
    }
}

// =============================================================================
// Credential
// =============================================================================

/// A validated login request.
///
/// Serializes to the login payload `{username, password, rol}`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ValidCredential {
    pub username: String,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

impl fmt::Debug for ValidCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
