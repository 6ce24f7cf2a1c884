//! The get command

use std::io::Write;
use std::path::Path;

use depot_core::FileStore;
use depot_fs::{NormalizedPath, io};

use super::Outcome;
use crate::error::{CliError, Result};

/// Write a stored file to `output`, or to stdout.
pub fn run_get(store: &FileStore, id: &str, output: Option<&Path>) -> Result<Outcome> {
    let content = store.retrieve(id)?;

    match output {
        Some(path) => {
            let target = std::path::absolute(path).map_err(|e| CliError::io(path, e))?;
            io::write_atomic(&NormalizedPath::new(target), &content, store.config().robustness)?;
            tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output file");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&content)
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::io("<stdout>", e))?;
        }
    }
    Ok(Outcome::Done)
}
