//! # Client Configuration
//!
//! Configuration management for the catalog client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the CLI)          │
//! │     --api-url http://books.local:5000/                                 │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BIBLIO_API_URL=http://books.local:5000/                            │
//! │     BIBLIO_SESSION_PATH=/tmp/biblio-session.toml                       │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/biblio/config.toml (Linux)                               │
//! │     ~/Library/Application Support/org.biblio.biblio/config.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/, session file next to the config file       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [api]
//! base_url = "http://localhost:5000/"
//!
//! [session]
//! path = "/home/ana/.config/biblio/session.toml"  # optional
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Environment variable overriding `[api] base_url`.
pub const ENV_API_URL: &str = "BIBLIO_API_URL";

/// Environment variable overriding `[session] path`.
pub const ENV_SESSION_PATH: &str = "BIBLIO_SESSION_PATH";

// =============================================================================
// API Settings
// =============================================================================

/// Where the catalog backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL; endpoint paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Where the session file lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Explicit session file; the platform config dir is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment and defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Like [`ClientConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Checks that the base URL is an absolute http(s) URL with a host.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url().map(|_| ())
    }

    /// Parses the base URL, adding the trailing slash endpoint joins need.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut url = Url::parse(self.api.base_url.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if url.host_str().is_none() {
            return Err(ClientError::Config(format!(
                "API URL has no host: {}",
                self.api.base_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Returns the session file path: configured, or the platform default.
    pub fn session_path(&self) -> ClientResult<PathBuf> {
        self.session
            .path
            .clone()
            .or_else(Self::default_session_path)
            .ok_or_else(|| ClientError::Config("No session path available".into()))
    }

    /// Overrides the base URL (used for the `--api-url` flag).
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.api.base_url = url.into();
    }

    /// Applies overrides read through `lookup` (the process environment
    /// in [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(path) = lookup(ENV_SESSION_PATH) {
            debug!(path = %path, "Overriding session path from environment");
            self.session.path = Some(PathBuf::from(path));
        }
    }

    /// `config.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// `session.toml` in the platform config directory.
    pub fn default_session_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("session.toml"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "biblio", "biblio")
}
