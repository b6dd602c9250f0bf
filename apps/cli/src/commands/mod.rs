//! # Commands Module
//!
//! One function per subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Console, dispatch)
//! ├── auth.rs     ◄─── login, logout, whoami
//! ├── books.rs    ◄─── list, show, add, edit, delete
//! └── config.rs   ◄─── config
//! ```
//!
//! Commands write results to the console's output and return `Err(Notice)`
//! on failure. Printing the notice and choosing the exit status is left to
//! `main`.

pub mod auth;
pub mod books;
pub mod config;

use std::io::{BufRead, Write};

use biblio_core::SessionStore;

use crate::args::Command;
use crate::error::Notice;
use crate::state::AppState;

/// Result type for commands.
pub type CommandResult = Result<(), Notice>;

/// Where commands read answers from and write results to.
pub struct Console<'a> {
    pub out: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, input: &'a mut dyn BufRead) -> Self {
        Console { out, input }
    }

    /// Prints one line of output.
    pub fn line(&mut self, text: impl AsRef<str>) -> CommandResult {
        writeln!(self.out, "{}", text.as_ref())?;
        Ok(())
    }

    /// Prints a success notice.
    pub fn success(&mut self, message: impl AsRef<str>) -> CommandResult {
        writeln!(self.out, "✔ {}", message.as_ref())?;
        Ok(())
    }

    /// Asks a yes/no question; anything but `y`/`yes` (or EOF) is no.
    pub fn confirm(&mut self, question: &str) -> Result<bool, Notice> {
        write!(self.out, "{} [y/N] ", question)?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "s" | "si" | "sí"
        ))
    }
}

/// Runs one subcommand.
pub async fn dispatch<S: SessionStore>(
    state: &mut AppState<S>,
    command: Command,
    console: &mut Console<'_>,
) -> CommandResult {
    match command {
        Command::Login {
            username,
            password,
            role,
        } => auth::login(state, &username, &password, &role, console).await,
        Command::Logout => auth::logout(state, console),
        Command::Whoami => auth::whoami(state, console),
        Command::List { search } => books::list(state, search.as_deref(), console).await,
        Command::Show { id } => books::show(state, id, console).await,
        Command::Add {
            title,
            author,
            price,
        } => books::add(state, &title, &author, &price, console).await,
        Command::Edit {
            id,
            title,
            author,
            price,
        } => {
            let changes = books::BookChanges {
                title,
                author,
                price,
            };
            books::edit(state, id, changes, console).await
        }
        Command::Delete { id, yes } => books::delete(state, id, yes, console).await,
        Command::Config { set_api_url } => config::config(state, set_api_url, console),
    }
}
