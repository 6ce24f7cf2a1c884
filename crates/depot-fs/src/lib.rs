//! Filesystem primitives for depot
//!
//! Provides lexical path normalization, segment-aware containment checks and
//! safe I/O operations. Nothing in this crate knows about file identifiers;
//! that lives in `depot-core`.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
