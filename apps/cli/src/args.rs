//! # Command-Line Arguments
//!
//! ```text
//! biblio [--config PATH] [--api-url URL] <COMMAND>
//!
//!   login   --username U --password P [--role usuario]
//!   logout
//!   whoami
//!   list    [--search TERM]
//!   show    ID
//!   add     --title T --author A --price 12.50
//!   edit    ID [--title T] [--author A] [--price P]
//!   delete  ID [--yes]
//!   config  [--set-api-url URL]
//! ```

use std::path::PathBuf;

use biblio_core::BookId;
use clap::{Args, Parser, Subcommand};

/// Biblio - manage the book catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "biblio")]
#[command(author = "Biblio Team")]
#[command(version)]
#[command(about = "Book catalog client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: platform config dir)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and BIBLIO_API_URL)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short = 'u', long)]
        username: String,

        #[arg(short = 'p', long, env = "BIBLIO_PASSWORD", hide_env_values = true)]
        password: String,

        /// admin, moderador or usuario
        #[arg(short = 'r', long, default_value = "usuario")]
        role: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user and what they may do
    Whoami,

    /// List books, optionally filtered by title or author
    List {
        #[arg(short = 's', long)]
        search: Option<String>,
    },

    /// Show one book
    Show { id: BookId },

    /// Add a book (admin, moderador)
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long, allow_hyphen_values = true)]
        price: String,
    },

    /// Edit a book; omitted fields keep their current value (admin, moderador)
    Edit {
        id: BookId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },

    /// Delete a book (admin)
    Delete {
        id: BookId,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the effective configuration, or change the saved API URL
    Config {
        #[arg(long)]
        set_api_url: Option<String>,
    },
}
