//! # Config Command
//!
//! Shows the effective settings, or saves a new API URL.

use biblio_client::ClientConfig;
use biblio_core::SessionStore;

use super::{CommandResult, Console};
use crate::state::AppState;

pub fn config<S: SessionStore>(
    state: &mut AppState<S>,
    set_api_url: Option<String>,
    console: &mut Console<'_>,
) -> CommandResult {
    if let Some(url) = set_api_url {
        state.config.set_base_url(url);
        let base_url = state.config.base_url()?;
        state.config.save(state.config_path.clone())?;
        return console.success(format!("API URL set to {}", base_url));
    }

    let config_path = state
        .config_path
        .clone()
        .or_else(ClientConfig::default_config_path);
    let config_file = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    console.line(format!("API URL:      {}", state.config.base_url()?))?;
    console.line(format!("Session file: {}", state.config.session_path()?.display()))?;
    console.line(format!("Config file:  {}", config_file))
}
