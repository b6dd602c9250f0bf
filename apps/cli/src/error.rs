//! # Notices
//!
//! What the terminal shows when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in biblio                                 │
//! │                                                                         │
//! │  command ──► CatalogService ──► Result<T, ClientError>                 │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                      Notice { code, message }                          │
//! │                      message = ClientError::user_message()             │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                      stderr: "✖ El título es obligatorio"              │
//! │                      exit status 1                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Network and server failures show a generic message; the underlying
//! error goes to the log instead.

use std::fmt;

use biblio_client::ClientError;
use biblio_core::CoreError;

/// A user-facing error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Machine-readable category
    pub code: NoticeCode,

    /// Human-readable message for display
    pub message: String,
}

/// Notice categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCode {
    /// Input rejected before sending
    ValidationError,

    /// Role may not do this
    Forbidden,

    /// Log in (again)
    AuthRequired,

    /// Book does not exist
    NotFound,

    /// Bad config or session file
    ConfigError,

    /// Network or server failure
    Unexpected,
}

impl NoticeCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoticeCode::ValidationError => "VALIDATION_ERROR",
            NoticeCode::Forbidden => "FORBIDDEN",
            NoticeCode::AuthRequired => "AUTH_REQUIRED",
            NoticeCode::NotFound => "NOT_FOUND",
            NoticeCode::ConfigError => "CONFIG_ERROR",
            NoticeCode::Unexpected => "UNEXPECTED",
        }
    }
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Notice {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Notice::new(NoticeCode::NotFound, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Notice::new(NoticeCode::Unexpected, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Notice {}

/// Converts client errors to notices.
impl From<ClientError> for Notice {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Validation(_) => NoticeCode::ValidationError,
            ClientError::Forbidden { .. } => NoticeCode::Forbidden,
            ClientError::NotLoggedIn | ClientError::Auth { .. } => NoticeCode::AuthRequired,
            ClientError::NotFound { .. } => NoticeCode::NotFound,
            ClientError::Config(_) | ClientError::Session(_) => NoticeCode::ConfigError,
            ClientError::Rejected { .. } | ClientError::Unexpected(_) => {
                tracing::error!("Catalog request failed: {}", err);
                NoticeCode::Unexpected
            }
        };
        Notice::new(code, err.user_message())
    }
}

/// Converts core errors (permission checks done by commands) to notices.
impl From<CoreError> for Notice {
    fn from(err: CoreError) -> Self {
        ClientError::from(err).into()
    }
}

/// Terminal I/O failures.
impl From<std::io::Error> for Notice {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Terminal I/O failed: {}", err);
        Notice::unexpected(format!("Terminal I/O failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_core::validation::validate_book;
    use biblio_core::{Action, Role};

    #[test]
    fn test_validation_notice_lists_every_field() {
        let errors = validate_book("", "", "abc").unwrap_err();
        let notice = Notice::from(ClientError::from(errors));
        assert_eq!(notice.code, NoticeCode::ValidationError);
        assert_eq!(
            notice.message,
            "title is required; author is required; price must be a number"
        );
    }

    #[test]
    fn test_forbidden_notice() {
        let notice = Notice::from(CoreError::Forbidden {
            role: Role::User,
            action: Action::Add,
        });
        assert_eq!(notice.code, NoticeCode::Forbidden);
        assert_eq!(notice.message, "Users are not allowed to add books");
    }

    #[test]
    fn test_backend_message_passes_through() {
        let notice = Notice::from(ClientError::from_status(
            401,
            Some("Credenciales incorrectas".into()),
        ));
        assert_eq!(notice.code, NoticeCode::AuthRequired);
        assert_eq!(notice.to_string(), "Credenciales incorrectas");
    }

    #[test]
    fn test_server_failure_is_generic() {
        let notice = Notice::from(ClientError::Unexpected("connection refused".into()));
        assert_eq!(notice.code, NoticeCode::Unexpected);
        assert_eq!(notice.message, biblio_client::FALLBACK_MESSAGE);
        assert_eq!(notice.code.as_str(), "UNEXPECTED");
    }
}
