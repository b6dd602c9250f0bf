//! # Validation Module
//!
//! Book and credential validators for Biblio.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI arguments (clap)                                         │
//! │  └── Presence of flags, integer ids                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trimming, lengths, price range, role-specific password rules      │
//! │  └── Every violated field reported at once, in form order              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Its own checks; its messages are shown verbatim                   │
//! │                                                                         │
//! │  A form that fails here is never sent.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Error Per Field
//! Rules for a field run in order and stop at the first failure, so a
//! blank username reports `Required` and not also `TooShort`. Fields are
//! independent: a bad title does not hide a bad price.
//!
//! ## Usage
//! ```rust
//! use biblio_core::validation::{validate_book, validate_credential};
//! use biblio_core::{Field, FieldError, Role};
//!
//! let errors = validate_book("", "Borges", "-1").unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(errors.contains(&FieldError::Required { field: Field::Title }));
//! assert!(errors.contains(&FieldError::Negative { field: Field::Price }));
//!
//! let cred = validate_credential("ana", "mod_secret", "moderador").unwrap();
//! assert_eq!(cred.role, Role::Moderator);
//! ```

use crate::error::{Field, FieldError, FieldErrors};
use crate::price::{Price, PriceError};
use crate::role::Role;
use crate::types::{ValidBook, ValidCredential};
use crate::{
    ADMIN_PASSWORD_SPECIALS, MAX_AUTHOR_LEN, MAX_PRICE, MAX_TITLE_LEN, MAX_USERNAME_LEN,
    MIN_PASSWORD_LEN, MIN_USERNAME_LEN, MODERATOR_PASSWORD_PREFIX,
};

/// Result type for single-field validators.
pub type FieldResult<T> = Result<T, FieldError>;

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a candidate book.
///
/// ## Rules
/// - title: non-empty after trim, at most 30 characters
/// - author: non-empty after trim, at most 30 characters
/// - price: a decimal number within `0.00..=9999.99`
///
/// Returns the trimmed record with its price in cents, or one error per
/// violated field in the order title, author, price.
pub fn validate_book(title: &str, author: &str, price: &str) -> Result<ValidBook, FieldErrors> {
    match (validate_title(title), validate_author(author), validate_price(price)) {
        (Ok(title), Ok(author), Ok(price)) => Ok(ValidBook {
            title,
            author,
            price,
        }),
        (title, author, price) => Err(collect([title.err(), author.err(), price.err()])),
    }
}

/// Validates login input.
///
/// ## Rules
/// - username: non-empty after trim, 3 to 20 characters
/// - password: non-empty, at least 4 characters; moderators need the `mod_`
///   prefix and admins need one of `@#$%^&+=`
/// - role: admin, moderador or usuario
///
/// The role-specific password rules only run when the role is recognized.
/// The password is never trimmed.
pub fn validate_credential(
    username: &str,
    password: &str,
    role: &str,
) -> Result<ValidCredential, FieldErrors> {
    let role = validate_role(role);
    let checked_password = validate_password(password, role.as_ref().ok().copied());

    match (validate_username(username), checked_password, role) {
        (Ok(username), Ok(()), Ok(role)) => Ok(ValidCredential {
            username,
            password: password.to_string(),
            role,
        }),
        (username, password, role) => Err(collect([username.err(), password.err(), role.err()])),
    }
}

/// Gathers the failures of a form, keeping field order.
///
/// Only called on the error arm, where at least one entry is `Some`.
fn collect<const N: usize>(errors: [Option<FieldError>; N]) -> FieldErrors {
    errors.into_iter().flatten().collect()
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a book title, returning it trimmed.
pub fn validate_title(title: &str) -> FieldResult<String> {
    required_text(title, Field::Title, MAX_TITLE_LEN)
}

/// Validates an author name, returning it trimmed.
pub fn validate_author(author: &str) -> FieldResult<String> {
    required_text(author, Field::Author, MAX_AUTHOR_LEN)
}

/// Validates price text, returning the amount in cents.
///
/// ## Example
/// ```rust
/// use biblio_core::validation::validate_price;
///
/// assert_eq!(validate_price("9.99").unwrap().cents(), 999);
/// assert!(validate_price("").is_err());
/// ```
pub fn validate_price(price: &str) -> FieldResult<Price> {
    Price::parse(price).map_err(|err| match err {
        PriceError::NotNumeric => FieldError::NotNumeric {
            field: Field::Price,
        },
        PriceError::Negative => FieldError::Negative {
            field: Field::Price,
        },
        PriceError::TooLarge => FieldError::TooLarge {
            field: Field::Price,
            max: MAX_PRICE,
        },
    })
}

/// Validates a username, returning it trimmed.
///
/// Length limits apply to the trimmed value.
pub fn validate_username(username: &str) -> FieldResult<String> {
    let username = username.trim();
    let len = username.chars().count();

    if len == 0 {
        return Err(FieldError::Required {
            field: Field::Username,
        });
    }

    if len < MIN_USERNAME_LEN {
        return Err(FieldError::TooShort {
            field: Field::Username,
            min: MIN_USERNAME_LEN,
        });
    }

    if len > MAX_USERNAME_LEN {
        return Err(FieldError::TooLong {
            field: Field::Username,
            max: MAX_USERNAME_LEN,
        });
    }

    Ok(username.to_string())
}

/// Validates a password for `role`.
///
/// With `role == None` (unrecognized role) only the generic rules apply.
pub fn validate_password(password: &str, role: Option<Role>) -> FieldResult<()> {
    if password.is_empty() {
        return Err(FieldError::Required {
            field: Field::Password,
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::TooShort {
            field: Field::Password,
            min: MIN_PASSWORD_LEN,
        });
    }

    match role {
        Some(Role::Moderator) if !password.starts_with(MODERATOR_PASSWORD_PREFIX) => {
            Err(FieldError::BadFormat {
                field: Field::Password,
                reason: format!("moderator passwords must start with '{MODERATOR_PASSWORD_PREFIX}'"),
            })
        }
        Some(Role::Admin) if !password.contains(|c| ADMIN_PASSWORD_SPECIALS.contains(c)) => {
            Err(FieldError::BadFormat {
                field: Field::Password,
                reason: format!(
                    "admin passwords must contain one of '{ADMIN_PASSWORD_SPECIALS}'"
                ),
            })
        }
        Some(Role::Admin | Role::Moderator | Role::User) | None => Ok(()),
    }
}

/// Validates role text.
pub fn validate_role(role: &str) -> FieldResult<Role> {
    role.parse()
}

fn required_text(value: &str, field: Field, max: usize) -> FieldResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(FieldError::Required { field });
    }

    if value.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }

    Ok(value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
