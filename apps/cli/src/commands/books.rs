//! # Book Commands
//!
//! `list`, `show`, `add`, `edit` and `delete`.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  biblio edit 7 --price 9.99                                             │
//! │                                                                         │
//! │  role check (local) ──► GET libros/7 ──► merge omitted fields          │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                      validate_book ──► PUT libros/7 ──► refresh        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use biblio_client::ClientError;
use biblio_core::{Action, Book, BookId, SessionStore};

use super::{CommandResult, Console};
use crate::error::{Notice, NoticeCode};
use crate::state::AppState;

// =============================================================================
// Reads
// =============================================================================

/// Reloads the catalog and prints it, optionally filtered.
pub async fn list<S: SessionStore>(
    state: &mut AppState<S>,
    search: Option<&str>,
    console: &mut Console<'_>,
) -> CommandResult {
    state.service.refresh().await?;

    if state.service.catalog().is_empty() {
        return console.line("The catalog is empty.");
    }

    let term = search.unwrap_or("");
    let books: Vec<&Book> = state.service.search(term).collect();
    if books.is_empty() {
        return console.line(format!("No books match '{}'.", term));
    }

    print_table(&books, console)
}

/// Prints one book.
pub async fn show<S: SessionStore>(
    state: &mut AppState<S>,
    id: BookId,
    console: &mut Console<'_>,
) -> CommandResult {
    let book = state.service.fetch(id).await?;
    console.line(format!("#{} {}", book.id, book.title))?;
    console.line(format!("  Author: {}", book.author))?;
    console.line(format!("  Price:  {}", book.price))
}

fn print_table(books: &[&Book], console: &mut Console<'_>) -> CommandResult {
    console.line(format!(
        "{:<4} {:<30} {:<30} {:>10}",
        "ID", "Title", "Author", "Price"
    ))?;
    for book in books {
        console.line(format!(
            "{:<4} {:<30} {:<30} {:>10}",
            book.id,
            book.title,
            book.author,
            book.price.to_string()
        ))?;
    }
    Ok(())
}

// =============================================================================
// Mutations
// =============================================================================

/// Adds a book.
pub async fn add<S: SessionStore>(
    state: &mut AppState<S>,
    title: &str,
    author: &str,
    price: &str,
    console: &mut Console<'_>,
) -> CommandResult {
    let created = state.service.create(title, author, price).await?;
    match created {
        Some(book) => console.success(format!("Book created: {}", book))?,
        None => console.success(format!("Book created: {}", title.trim()))?,
    }
    note_stale(state, console)
}

/// Fields given on the `edit` command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<String>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.price.is_none()
    }

    /// Fills omitted fields from `current`, yielding raw form input
    /// for `validate_book`.
    pub fn merge(self, current: &Book) -> (String, String, String) {
        (
            self.title.unwrap_or_else(|| current.title.clone()),
            self.author.unwrap_or_else(|| current.author.clone()),
            self.price
                .unwrap_or_else(|| current.price.to_decimal_string()),
        )
    }
}

/// Changes the given fields of a book.
pub async fn edit<S: SessionStore>(
    state: &mut AppState<S>,
    id: BookId,
    changes: BookChanges,
    console: &mut Console<'_>,
) -> CommandResult {
    require(state, Action::Edit)?;
    if changes.is_empty() {
        return Err(Notice::new(
            NoticeCode::ValidationError,
            "Nothing to change: give --title, --author or --price",
        ));
    }

    let current = state.service.fetch(id).await?;
    let (title, author, price) = changes.merge(&current);
    state.service.update(id, &title, &author, &price).await?;
    console.success(format!("Book #{} updated", id))?;
    note_stale(state, console)
}

/// The change is saved either way; the reload is reported on its own.
fn note_stale<S: SessionStore>(state: &AppState<S>, console: &mut Console<'_>) -> CommandResult {
    if state.service.is_stale() {
        console.line(STALE_NOTE)?;
    }
    Ok(())
}

const STALE_NOTE: &str = "The change was saved, but the book list could not be reloaded.";

/// Deletes a book, asking first unless `yes` is set.
pub async fn delete<S: SessionStore>(
    state: &mut AppState<S>,
    id: BookId,
    yes: bool,
    console: &mut Console<'_>,
) -> CommandResult {
    require(state, Action::Delete)?;

    if !yes {
        let book = state.service.fetch(id).await?;
        let question = format!("Delete '{}' (#{})?", book.title, book.id);
        if !console.confirm(&question)? {
            return console.line("Cancelled.");
        }
    }

    state.service.delete(id).await?;
    console.success(format!("Book #{} deleted", id))
}

/// Checks login and role before anything goes over the network.
fn require<S: SessionStore>(state: &AppState<S>, action: Action) -> Result<(), Notice> {
    let session = state.service.session();
    if !session.is_authenticated() {
        return Err(ClientError::NotLoggedIn.into());
    }
    session.authorize(action)?;
    Ok(())
}
