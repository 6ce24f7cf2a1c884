//! Shared test utilities for the depot workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`depot`]: [`TestDepot`], a file store over a temporary directory
//! - [`observer`]: [`RecordingObserver`], which captures every reported
//!   operation for assertions

pub mod depot;
pub mod observer;

pub use depot::TestDepot;
pub use observer::{Recorded, RecordingObserver};
