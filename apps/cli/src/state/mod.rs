//! # State Module
//!
//! Everything a command needs, built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Assembly                                       │
//! │                                                                         │
//! │  --config / default path ──► ClientConfig::load (file + env)           │
//! │  --api-url               ──► overrides base_url, re-validated          │
//! │                                     │                                   │
//! │                 ┌───────────────────┴───────────────────┐               │
//! │                 ▼                                       ▼               │
//! │      CatalogClient::new(base_url)      FileSessionStore::open(path)    │
//! │                 └───────────────────┬───────────────────┘               │
//! │                                     ▼                                   │
//! │                     AppState { config, service }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use biblio_client::{CatalogClient, CatalogService, ClientConfig, ClientResult, FileSessionStore};
use biblio_core::SessionStore;
use tracing::debug;

use crate::args::GlobalArgs;

/// Config plus the catalog service for one CLI run.
#[derive(Debug)]
pub struct AppState<S: SessionStore> {
    pub config: ClientConfig,

    /// Explicit `--config` path; `None` means the platform default.
    pub config_path: Option<PathBuf>,

    pub service: CatalogService<S>,
}

impl<S: SessionStore> AppState<S> {
    /// Assembles state around an existing session store.
    pub fn with_store(config: ClientConfig, store: S) -> ClientResult<Self> {
        let client = CatalogClient::new(config.base_url()?);
        Ok(AppState {
            config,
            config_path: None,
            service: CatalogService::new(client, store),
        })
    }
}

impl AppState<FileSessionStore> {
    /// Loads config and opens the session file.
    pub fn from_args(args: &GlobalArgs) -> ClientResult<Self> {
        let config = resolve_config(args)?;
        let session_path = config.session_path()?;
        debug!(path = ?session_path, "Using session file");

        let store = FileSessionStore::open(session_path);
        let mut state = Self::with_store(config, store)?;
        state.config_path = args.config.clone();
        Ok(state)
    }
}

/// File and environment first, then the command-line override.
pub fn resolve_config(args: &GlobalArgs) -> ClientResult<ClientConfig> {
    let mut config = ClientConfig::load(args.config.clone())?;

    if let Some(url) = &args.api_url {
        config.set_base_url(url.clone());
        config.validate()?;
    }

    Ok(config)
}
