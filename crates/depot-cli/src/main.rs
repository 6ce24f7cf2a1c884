//! depot CLI
//!
//! A thin command-line host for `depot-core`: each subcommand opens the
//! store, runs one operation and prints the result.

mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} failed to initialise logging: {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!(command = ?cli.command, "starting depot");

    match commands::execute(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
