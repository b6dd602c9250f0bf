//! # Biblio CLI Library
//!
//! Everything behind the `biblio` binary except `main` itself.
//!
//! ## Module Organization
//! ```text
//! biblio_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup & execute)
//! ├── args.rs         ◄─── clap definitions
//! ├── state/
//! │   └── mod.rs      ◄─── AppState: config + catalog service
//! ├── commands/
//! │   ├── mod.rs      ◄─── Console, dispatch
//! │   ├── auth.rs     ◄─── login, logout, whoami
//! │   ├── books.rs    ◄─── list, show, add, edit, delete
//! │   └── config.rs   ◄─── config
//! └── error.rs        ◄─── Notice type for failed commands
//! ```
//!
//! ## Invocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging: EnvFilter from RUST_LOG, default warn, stderr  │
//! │  3. AppState::from_args: config file + env + flags, session file       │
//! │  4. dispatch one command, writing results to stdout                    │
//! │  5. main prints "✖ message" for a Notice and exits with status 1       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod args;
pub mod commands;
pub mod error;
pub mod state;

use std::io;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::Cli;
use commands::Console;
use error::Notice;
use state::AppState;

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=info` - Logins, logouts and mutations
/// - `RUST_LOG=biblio_client=debug` - Every request
/// - Default: WARN level
///
/// Logs go to stderr; stdout carries command output only.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Runs the parsed command against stdout and stdin.
pub async fn execute(cli: Cli) -> Result<(), Notice> {
    let mut state = AppState::from_args(&cli.global)?;
    debug!(command = %command_name(&cli.command), "Running command");

    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut out = stdout.lock();
    let mut input = stdin.lock();
    let mut console = Console::new(&mut out, &mut input);

    commands::dispatch(&mut state, cli.command, &mut console).await
}

fn command_name(command: &args::Command) -> &'static str {
    use args::Command::*;
    match command {
        Login { .. } => "login",
        Logout => "logout",
        Whoami => "whoami",
        List { .. } => "list",
        Show { .. } => "show",
        Add { .. } => "add",
        Edit { .. } => "edit",
        Delete { .. } => "delete",
        Config { .. } => "config",
    }
}
