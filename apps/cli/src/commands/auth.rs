//! # Session Commands
//!
//! `login`, `logout` and `whoami`.

use biblio_client::ClientError;
use biblio_core::SessionStore;

use super::{CommandResult, Console};
use crate::state::AppState;

/// Logs in and stores the session.
pub async fn login<S: SessionStore>(
    state: &mut AppState<S>,
    username: &str,
    password: &str,
    role: &str,
    console: &mut Console<'_>,
) -> CommandResult {
    let session = state.service.login(username, password, role).await?;
    console.success(format!(
        "Welcome, {} ({})",
        session.username,
        session.role.label()
    ))
}

/// Forgets the stored session. Logging out twice is not an error.
pub fn logout<S: SessionStore>(state: &mut AppState<S>, console: &mut Console<'_>) -> CommandResult {
    state.service.logout()?;
    console.success("Logged out")
}

/// Prints who is logged in and what they may do.
pub fn whoami<S: SessionStore>(state: &AppState<S>, console: &mut Console<'_>) -> CommandResult {
    let session = state.service.session();
    if !session.is_authenticated() {
        return Err(ClientError::NotLoggedIn.into());
    }

    let role = session.current_role();
    let actions: Vec<&str> = role.permitted_actions().map(|a| a.as_str()).collect();
    let actions = if actions.is_empty() {
        "read only".to_string()
    } else {
        actions.join(", ")
    };

    console.line(format!("{} ({})", session.username(), role.label()))?;
    console.line(format!("May: {}", actions))
}
