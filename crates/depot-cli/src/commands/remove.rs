//! The rm command

use colored::Colorize;
use depot_core::FileStore;

use super::Outcome;
use crate::error::Result;

/// Delete a stored file. With `if_exists`, an absent file is not an error.
pub fn run_rm(store: &FileStore, id: &str, if_exists: bool) -> Result<Outcome> {
    if if_exists {
        if !store.remove(id)? {
            eprintln!("{} nothing stored under {}", "note:".cyan().bold(), id);
        }
    } else {
        store.delete(id)?;
    }
    Ok(Outcome::Done)
}
