//! # Error Types
//!
//! Domain-specific error types for biblio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  biblio-core errors (this file)                                        │
//! │  ├── FieldError   - One rule violated by one input field               │
//! │  ├── FieldErrors  - Every violated field of one form, in order         │
//! │  └── CoreError    - Forbidden action or failed validation              │
//! │                                                                         │
//! │  biblio-client errors (separate crate)                                 │
//! │  └── ClientError  - Auth / NotFound / Unexpected / Config              │
//! │                                                                         │
//! │  CLI notices (in app)                                                  │
//! │  └── Notice       - What the terminal shows                            │
//! │                                                                         │
//! │  Flow: FieldErrors → ClientError::Validation → Notice → stderr         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every field error names its field
//! 3. Errors are enum variants, never String
//! 4. Validation errors never leave the client

use std::fmt;

use thiserror::Error;

use crate::price::Price;
use crate::role::{Action, Role};

// =============================================================================
// Field
// =============================================================================

/// An input field of the login form or the book form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Price,
    Username,
    Password,
    Role,
}

impl Field {
    /// Returns the field name as shown to users.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Price => "price",
            Field::Username => "username",
            Field::Password => "password",
            Field::Role => "role",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Error
// =============================================================================

/// A single rule violated by a single field.
///
/// ## Rule Table
/// ```text
/// ┌────────────┬──────────────────────────────────────────────────────────┐
/// │ Variant    │ Raised when                                              │
/// ├────────────┼──────────────────────────────────────────────────────────┤
/// │ Required   │ value empty (after trim, except password)                │
/// │ TooShort   │ username < 3 chars, password < 4 chars                   │
/// │ TooLong    │ title/author > 30 chars, username > 20 chars             │
/// │ NotNumeric │ price text is not a decimal number                       │
/// │ Negative   │ price < 0                                                │
/// │ TooLarge   │ price > 9999.99                                          │
/// │ BadFormat  │ role-specific password policy not met                    │
/// │ InvalidRole│ role is not admin / moderador / usuario                  │
/// └────────────┴──────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: Field },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: Field, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },

    /// Value could not be read as a decimal number.
    #[error("{field} must be a number")]
    NotNumeric { field: Field },

    /// Value is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: Field },

    /// Value is above the allowed maximum.
    #[error("{field} cannot exceed {max}")]
    TooLarge { field: Field, max: Price },

    /// Value does not follow the required format.
    #[error("{field} has invalid format: {reason}")]
    BadFormat { field: Field, reason: String },

    /// Role text is not one of the known roles.
    #[error("role '{value}' is not recognized (expected admin, moderador or usuario)")]
    InvalidRole { value: String },
}

impl FieldError {
    /// Returns the field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            FieldError::Required { field }
            | FieldError::TooShort { field, .. }
            | FieldError::TooLong { field, .. }
            | FieldError::NotNumeric { field }
            | FieldError::Negative { field }
            | FieldError::TooLarge { field, .. }
            | FieldError::BadFormat { field, .. } => *field,
            FieldError::InvalidRole { .. } => Field::Role,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every field error found in one form, in field order.
///
/// Never empty: a form with no violations yields `Ok`, not an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Wraps a list of errors, or returns `None` when there are none.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(FieldErrors(errors))
        }
    }

    /// Number of violated fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// False for every collection built by the validators.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the errors in field order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns true if the exact error is present.
    pub fn contains(&self, error: &FieldError) -> bool {
        self.0.contains(error)
    }

    /// Returns the error reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }

    /// Consumes the collection.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for FieldErrors {
    fn from(err: FieldError) -> Self {
        FieldErrors(vec![err])
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        FieldErrors(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The current role may not perform the action.
    ///
    /// ## When This Occurs
    /// - A `usuario` tries to add or edit a book
    /// - Anyone but an `admin` tries to delete a book
    #[error("role '{role}' is not allowed to {action} books")]
    Forbidden { role: Role, action: Action },

    /// Validation error (wraps FieldErrors).
    #[error("Validation error: {0}")]
    Validation(#[from] FieldErrors),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_messages() {
        let err = FieldError::Required {
            field: Field::Title,
        };
        assert_eq!(err.to_string(), "title is required");

        let err = FieldError::TooShort {
            field: Field::Username,
            min: 3,
        };
        assert_eq!(err.to_string(), "username must be at least 3 characters");

        let err = FieldError::TooLarge {
            field: Field::Price,
            max: Price::from_cents(999_999),
        };
        assert_eq!(err.to_string(), "price cannot exceed $9999.99");
    }

    #[test]
    fn test_field_of_invalid_role() {
        let err = FieldError::InvalidRole {
            value: "root".to_string(),
        };
        assert_eq!(err.field(), Field::Role);
    }

    #[test]
    fn test_field_errors_display_joins_in_order() {
        let errors = FieldErrors::from_vec(vec![
            FieldError::Required {
                field: Field::Title,
            },
            FieldError::Negative {
                field: Field::Price,
            },
        ])
        .unwrap();
        assert_eq!(
            errors.to_string(),
            "title is required; price cannot be negative"
        );
        assert!(errors.for_field(Field::Author).is_none());
    }

    #[test]
    fn test_empty_vec_is_not_an_error() {
        assert!(FieldErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_forbidden_message() {
        let err = CoreError::Forbidden {
            role: Role::Moderator,
            action: Action::Delete,
        };
        assert_eq!(
            err.to_string(),
            "role 'moderador' is not allowed to delete books"
        );
    }

    #[test]
    fn test_field_errors_convert_to_core_error() {
        let errors: FieldErrors = FieldError::Required {
            field: Field::Author,
        }
        .into();
        let core_err: CoreError = errors.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
