//! # Catalog Service
//!
//! Orchestrates one catalog operation end to end.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create / update / delete                          │
//! │                                                                         │
//! │  Session::load ──► authenticated? ──no──► ClientError::NotLoggedIn     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                 role permits? ──no──► ClientError::Forbidden           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                 validate_book ──fail──► ClientError::Validation        │
//! │                        │               (nothing sent)                   │
//! │                        ▼                                                │
//! │                 HTTP call ──401──► clear session, ClientError::Auth    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │   create/update: GET libros/ and replace the cache                     │
//! │   delete:        remove the row locally (only now, after success)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure leaves the cache and the session as they were, except that
//! a 401 logs the user out. Once the backend has accepted a create or
//! update, the call succeeds even if the reload after it fails; the cache
//! is then marked stale (see [`CatalogService::is_stale`]).

use biblio_core::validation::{validate_book, validate_credential};
use biblio_core::{Action, Book, BookCatalog, BookId, Role, Session, SessionStore};
use tracing::{info, warn};

use crate::client::CatalogClient;
use crate::error::{ClientError, ClientResult};

/// The client-side catalog: HTTP client, session store and book cache.
#[derive(Debug)]
pub struct CatalogService<S: SessionStore> {
    client: CatalogClient,
    store: S,
    catalog: BookCatalog,
    stale: bool,
}

impl<S: SessionStore> CatalogService<S> {
    /// Creates the service, picking up any token already in `store`.
    pub fn new(mut client: CatalogClient, store: S) -> Self {
        client.set_token(Session::load(&store).token);
        CatalogService {
            client,
            store,
            catalog: BookCatalog::new(),
            stale: false,
        }
    }

    /// The current session, resolved from the store.
    pub fn session(&self) -> Session {
        Session::load(&self.store)
    }

    /// The cached books, as of the last refresh.
    pub fn catalog(&self) -> &BookCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True when a mutation went through but the reload after it failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Validates the credential, logs in and stores the new session.
    ///
    /// The stored role is the one the backend echoes when it names a known
    /// role, and the requested one otherwise.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        role: &str,
    ) -> ClientResult<Session> {
        let credential = validate_credential(username, password, role)?;
        let response = self.client.login(&credential).await?;

        let role = response
            .rol
            .as_deref()
            .and_then(|r| r.parse::<Role>().ok())
            .unwrap_or(credential.role);
        let username = response
            .username
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| credential.username.clone());

        let session = Session::new(response.token, role, username);
        session.save(&mut self.store).map_err(store_error)?;
        self.client.set_token(session.token.clone());

        info!(username = %session.username, role = %session.role, "Logged in");
        Ok(session)
    }

    /// Clears the stored session and the cache.
    pub fn logout(&mut self) -> ClientResult<()> {
        Session::clear(&mut self.store).map_err(store_error)?;
        self.client.set_token(None);
        self.catalog.replace_all(Vec::new());
        self.stale = false;
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Reloads the cache from the backend.
    pub async fn refresh(&mut self) -> ClientResult<&BookCatalog> {
        self.require_login()?;
        let result = self.client.list_books().await;
        let books = self.checked(result)?;
        self.catalog.replace_all(books);
        self.stale = false;
        Ok(&self.catalog)
    }

    /// Filters the cache by title or author.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Book> + 'a {
        self.catalog.filter(term)
    }

    /// Fetches one book from the backend.
    pub async fn fetch(&mut self, id: BookId) -> ClientResult<Book> {
        self.require_login()?;
        let result = self.client.get_book(id).await;
        self.checked(result)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a book, then reloads the cache.
    pub async fn create(
        &mut self,
        title: &str,
        author: &str,
        price: &str,
    ) -> ClientResult<Option<Book>> {
        self.authorize(Action::Add)?;
        let book = validate_book(title, author, price)?;

        let result = self.client.create_book(&book).await;
        let created = self.checked(result)?;
        info!(title = %book.title, "Book created");

        self.reload_after_mutation().await;
        Ok(created)
    }

    /// Replaces a book's fields, then reloads the cache.
    pub async fn update(
        &mut self,
        id: BookId,
        title: &str,
        author: &str,
        price: &str,
    ) -> ClientResult<Option<Book>> {
        self.authorize(Action::Edit)?;
        let book = validate_book(title, author, price)?;

        let result = self.client.update_book(id, &book).await;
        let updated = self.checked(result)?;
        info!(id, title = %book.title, "Book updated");

        self.reload_after_mutation().await;
        Ok(updated)
    }

    /// Deletes a book; the cached row goes only after the backend agreed.
    pub async fn delete(&mut self, id: BookId) -> ClientResult<Option<Book>> {
        self.authorize(Action::Delete)?;

        let result = self.client.delete_book(id).await;
        self.checked(result)?;
        info!(id, "Book deleted");

        Ok(self.catalog.remove_by_id(id))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// The mutation already happened; a failed reload only marks the
    /// cache stale.
    async fn reload_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "Catalog reload failed after a successful change");
            self.stale = true;
        }
    }

    fn require_login(&self) -> ClientResult<Session> {
        let session = self.session();
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(ClientError::NotLoggedIn)
        }
    }

    fn authorize(&self, action: Action) -> ClientResult<()> {
        let session = self.require_login()?;
        session.authorize(action)?;
        Ok(())
    }

    /// Logs the user out when the backend rejected the token.
    fn checked<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::Auth { .. }) = &result {
            warn!("Backend rejected the session token, logging out");
            if let Err(err) = Session::clear(&mut self.store) {
                warn!(error = %err, "Failed to clear session store");
            }
            self.client.set_token(None);
        }
        result
    }
}

fn store_error<E: std::error::Error>(err: E) -> ClientError {
    ClientError::Session(err.to_string())
}
