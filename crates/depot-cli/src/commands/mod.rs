//! Command implementations for depot-cli

mod get;
mod inspect;
mod remove;
mod resolve;
mod store;

use std::process::ExitCode;

use depot_core::{FileStore, StoreConfig};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

/// How a successful command should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The queried file is not stored
    Absent,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Absent => ExitCode::from(2),
        }
    }
}

/// Open the store described by the global flags and run the subcommand.
pub fn execute(cli: Cli) -> Result<Outcome> {
    let store = FileStore::open(load_config(&cli)?)?;
    tracing::debug!(root = %store.root(), "opened store");

    match cli.command {
        Commands::Store { file, name } => store::run_store(&store, &file, name.as_deref()),
        Commands::Get { id, output } => get::run_get(&store, &id, output.as_deref()),
        Commands::Exists { id } => inspect::run_exists(&store, &id),
        Commands::Rm { id, if_exists } => remove::run_rm(&store, &id, if_exists),
        Commands::Stat { id, json } => inspect::run_stat(&store, &id, json),
        Commands::Ls { json } => inspect::run_ls(&store, json),
        Commands::Resolve { path } => resolve::run_resolve(&store, &path),
    }
}

/// `--config` if given, otherwise defaults; `--root` always wins.
fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_optional(path)?.ok_or_else(|| {
            CliError::user(format!("config file not found: {}", path.display()))
        })?,
        None => StoreConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    Ok(config)
}
