//! # biblio-core: Pure Business Logic for Biblio
//!
//! This crate holds the rules of the book catalog client as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Biblio Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`biblio`)                          │   │
//! │  │    login ──► list/search ──► add/edit ──► delete                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    biblio-client                                │   │
//! │  │    CatalogService, CatalogClient (HTTP), FileSessionStore       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ biblio-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   role    │  │  session  │  │validation │  │  catalog  │  │   │
//! │  │   │  Role     │  │  Session  │  │validate_  │  │BookCatalog│  │   │
//! │  │   │  Action   │  │  Store    │  │ book/cred │  │  filter   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO FILES • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`role`] - Closed role enumeration and the permission table
//! - [`session`] - Session resolver over an injected key-value store
//! - [`types`] - Book and credential records
//! - [`price`] - Price type with integer cents (no floating point!)
//! - [`validation`] - Book and credential validators
//! - [`catalog`] - Cached, searchable book collection
//! - [`error`] - Field errors and core errors
//!
//! ## Example Usage
//!
//! ```rust
//! use biblio_core::validation::validate_book;
//! use biblio_core::{MemorySessionStore, Role, Session};
//!
//! let book = validate_book("  Rayuela ", "Julio Cortázar", "12.5").unwrap();
//! assert_eq!(book.title, "Rayuela");
//! assert_eq!(book.price.cents(), 1250);
//!
//! let mut store = MemorySessionStore::new();
//! Session::new("token-1", Role::Moderator, "ana").save(&mut store).unwrap();
//!
//! let session = Session::load(&store);
//! assert!(session.can_edit());
//! assert!(!session.can_delete());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod price;
pub mod role;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::BookCatalog;
pub use error::{CoreError, CoreResult, Field, FieldError, FieldErrors};
pub use price::Price;
pub use role::{Action, Role};
pub use session::{MemorySessionStore, Session, SessionKey, SessionStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a book title, in characters.
///
/// Mirrors the backend's `VARCHAR(30)` column.
pub const MAX_TITLE_LEN: usize = 30;

/// Maximum length of an author name, in characters.
pub const MAX_AUTHOR_LEN: usize = 30;

/// Minimum length of a username, in characters.
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum length of a username, in characters.
pub const MAX_USERNAME_LEN: usize = 20;

/// Minimum length of a password, in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Highest price the client accepts ($9999.99).
pub const MAX_PRICE: Price = Price::from_cents(999_999);

/// Moderator passwords must start with this prefix.
pub const MODERATOR_PASSWORD_PREFIX: &str = "mod_";

/// Admin passwords must contain at least one of these characters.
pub const ADMIN_PASSWORD_SPECIALS: &str = "@#$%^&+=";
