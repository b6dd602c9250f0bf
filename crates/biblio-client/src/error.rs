//! # Client Error Types
//!
//! Error types for catalog client operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Local checks  │  │  Authentication │  │     Backend             │ │
//! │  │  (never sent)   │  │                 │  │                         │ │
//! │  │  Validation     │  │  NotLoggedIn    │  │  NotFound (404)         │ │
//! │  │  Forbidden      │  │  Auth (401)     │  │  Rejected (other 4xx/5xx│ │
//! │  └─────────────────┘  └─────────────────┘  │  Unexpected (network,   │ │
//! │                                            │   undecodable body)     │ │
//! │  ┌─────────────────┐  ┌─────────────────┐  └─────────────────────────┘ │
//! │  │  Configuration  │  │  Session store  │                              │
//! │  │  Config         │  │  Session        │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these is retried. Each one is turned into exactly one notice by
//! the caller, using [`ClientError::user_message`].

use thiserror::Error;

use biblio_core::{Action, CoreError, FieldErrors, Role};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the backend gives no message of its own.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Client error type covering every failure a catalog operation can report.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Local Checks
    // =========================================================================
    /// Input failed client-side validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// The session's role may not perform the action; nothing was sent.
    #[error("Role '{role}' is not allowed to {action} books")]
    Forbidden { role: Role, action: Action },

    // =========================================================================
    // Authentication
    // =========================================================================
    /// No token is stored; the user has to log in first.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The backend answered 401.
    #[error("Authentication failed{}", suffix(.message))]
    Auth { message: Option<String> },

    // =========================================================================
    // Backend
    // =========================================================================
    /// The backend answered 404.
    #[error("Not found{}", suffix(.message))]
    NotFound { message: Option<String> },

    /// The backend answered with another non-2xx status.
    #[error("Request rejected with status {status}{}", suffix(.message))]
    Rejected { status: u16, message: Option<String> },

    /// Network failure or an undecodable response body.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    // =========================================================================
    // Local Files
    // =========================================================================
    /// Invalid or unreadable configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The session store could not be written.
    #[error("Session store error: {0}")]
    Session(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Forbidden { role, action } => ClientError::Forbidden { role, action },
            CoreError::Validation(errors) => ClientError::Validation(errors),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Unexpected(format!("Invalid response body: {}", err))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(format!("Invalid URL: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-2xx status and the message found in its body.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ClientError::Auth { message },
            404 => ClientError::NotFound { message },
            _ => ClientError::Rejected { status, message },
        }
    }

    /// The text to show the user.
    ///
    /// Backend messages are shown verbatim; failures without one get a
    /// fixed text per category.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(errors) => errors.to_string(),
            ClientError::Forbidden { role, action } => format!(
                "{}s are not allowed to {} books",
                role.label(),
                action
            ),
            ClientError::NotLoggedIn => "You must log in first".to_string(),
            ClientError::Auth { message } => message
                .clone()
                .unwrap_or_else(|| "Your session is no longer valid, please log in again".into()),
            ClientError::NotFound { message } => {
                message.clone().unwrap_or_else(|| "Book not found".into())
            }
            ClientError::Rejected { message, .. } => {
                message.clone().unwrap_or_else(|| FALLBACK_MESSAGE.into())
            }
            ClientError::Unexpected(_) => FALLBACK_MESSAGE.to_string(),
            ClientError::Config(_) | ClientError::Session(_) => self.to_string(),
        }
    }

    /// Returns true if the user has to log in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::NotLoggedIn | ClientError::Auth { .. })
    }

    /// Returns true if the requested book does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    /// Returns true if the failure was detected before anything was sent.
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Forbidden { .. } | ClientError::NotLoggedIn
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ClientError::Config(_))
    }

    /// Returns true for network and server failures.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            ClientError::Unexpected(_) | ClientError::Rejected { .. }
        )
    }
}
