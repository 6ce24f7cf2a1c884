//! The resolve command

use depot_core::FileStore;

use super::Outcome;
use crate::error::Result;

/// Print the native path a request path maps to. Nothing is read.
pub fn run_resolve(store: &FileStore, request_path: &str) -> Result<Outcome> {
    let path = store.resolve_request(request_path)?;
    println!("{}", path.display());
    Ok(Outcome::Done)
}
