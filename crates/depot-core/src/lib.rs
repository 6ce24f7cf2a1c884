//! Contained file storage for depot
//!
//! This crate implements the storage service proper:
//!
//! - **Identifiers**: [`FileId`], 128 random bits from the OS CSPRNG
//! - **Path resolution**: [`Resolver`] maps identifiers and client paths onto
//!   the storage root and rejects anything that would leave it
//! - **Storage operations**: [`FileStore`] stores, retrieves, checks,
//!   enumerates and deletes files, built entirely on the resolver
//! - **Observation**: [`StoreObserver`] is injected into the store and told
//!   about every success and failure
//!
//! # Architecture
//!
//! ```text
//!          depot-cli / hosting layer
//!                     |
//!                depot-core
//!        (FileStore -> Resolver -> FileId)
//!                     |
//!                 depot-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use depot_core::{FileStore, StoreConfig};
//!
//! fn example() -> depot_core::Result<()> {
//!     let store = FileStore::open(StoreConfig::new("/srv/depot"))?;
//!     let id = store.store(b"hello", Some("a.txt"))?;
//!     assert_eq!(store.retrieve(&id.to_string())?, b"hello");
//!     store.delete(&id.to_string())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod observer;
pub mod resolver;
pub mod store;

pub use config::{DEFAULT_MAX_FILE_SIZE, StoreConfig};
pub use error::{Error, ErrorKind, Result};
pub use id::FileId;
pub use observer::{NoopObserver, Operation, StoreEvent, StoreObserver, TracingObserver};
pub use resolver::{Resolver, extension_of};
pub use store::{FileStore, StoredFile};
