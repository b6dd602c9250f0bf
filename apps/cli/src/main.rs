//! # biblio
//!
//! Command-line client for the book catalog.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use biblio_cli::args::Cli;
use biblio_cli::error::Notice;

fn main() -> ExitCode {
    let cli = Cli::parse();
    biblio_cli::init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Notice>() {
                Some(notice) => eprintln!("✖ {}", notice),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(biblio_cli::execute(cli))?;
    Ok(())
}
