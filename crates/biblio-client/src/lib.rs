//! # biblio-client
//!
//! Talks to the catalog backend and keeps the session between runs.
//!
//! ## Modules
//! - [`client`] - `CatalogClient`, one method per REST endpoint
//! - [`service`] - `CatalogService`, validation + permission + HTTP + cache
//! - [`session_file`] - `FileSessionStore`, the TOML-backed session store
//! - [`config`] - `ClientConfig`, base URL and session file location
//! - [`error`] - `ClientError` and its user-facing messages
//!
//! ## Example
//! ```rust,no_run
//! use biblio_client::{CatalogClient, CatalogService, ClientConfig, FileSessionStore};
//!
//! # async fn run() -> biblio_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let client = CatalogClient::new(config.base_url()?);
//! let store = FileSessionStore::open(config.session_path()?);
//!
//! let mut service = CatalogService::new(client, store);
//! service.login("ana", "mod_secret", "moderador").await?;
//! service.create("Rayuela", "Julio Cortázar", "12.50").await?;
//! for book in service.search("cortázar") {
//!     println!("{}", book);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod session_file;

pub use client::{CatalogClient, LoginResponse};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, FALLBACK_MESSAGE};
pub use service::CatalogService;
pub use session_file::{FileSessionStore, SessionFileError};
