//! The store command

use std::io::Read;
use std::path::Path;

use depot_core::FileStore;

use super::Outcome;
use crate::error::{CliError, Result};

/// Store `file` (or stdin for `-`) and print the new identifier.
pub fn run_store(store: &FileStore, file: &Path, name: Option<&str>) -> Result<Outcome> {
    let from_stdin = file == Path::new("-");
    let content = if from_stdin {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| CliError::io("<stdin>", e))?;
        buf
    } else {
        std::fs::read(file).map_err(|e| CliError::io(file, e))?
    };

    let original_name = match name {
        Some(name) => Some(name.to_string()),
        None if from_stdin => None,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
    };

    let id = store.store(&content, original_name.as_deref())?;
    println!("{id}");
    Ok(Outcome::Done)
}
