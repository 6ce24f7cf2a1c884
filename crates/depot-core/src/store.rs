//! Storage operations
//!
//! [`FileStore`] owns a storage root and exposes the file lifecycle on top of
//! it. Every path it touches comes from the [`Resolver`]; identifiers are
//! validated before any filesystem access.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use depot_fs::{NormalizedPath, io};
use serde::Serialize;

use crate::config::{self, StoreConfig};
use crate::observer::{Operation, StoreEvent, StoreObserver, TracingObserver};
use crate::resolver::{self, Resolver, extension_of};
use crate::{Error, FileId, Result};

const NON_UTF8_ROOT: Error = Error::InvalidRoot {
    reason: "is not valid UTF-8",
};

/// Metadata describing one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub id: FileId,
    pub extension: Option<String>,
    pub size_bytes: u64,
    /// Always a descendant of the storage root
    #[serde(skip)]
    pub stored_path: PathBuf,
}

impl StoredFile {
    /// On-disk file name: `<id>` or `<id>.<ext>`.
    pub fn file_name(&self) -> String {
        resolver::stored_name(&self.id, self.extension.as_deref())
    }
}

/// A directory entry matching a lookup.
struct Located {
    path: NormalizedPath,
    extension: Option<String>,
    size_bytes: u64,
}

/// Contained file storage over a single root directory.
///
/// `FileStore` holds no mutable state and can be shared between threads
/// behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct FileStore {
    resolver: Resolver,
    config: StoreConfig,
    observer: Arc<dyn StoreObserver>,
}

impl FileStore {
    /// Open a store, creating the root directory if needed. Operations are
    /// reported to a [`TracingObserver`].
    pub fn open(config: StoreConfig) -> Result<Self> {
        Self::open_with_observer(config, Arc::new(TracingObserver))
    }

    /// Open a store that reports to `observer`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRoot`] if the root exists but is not a directory, or
    ///   its absolute form is not valid UTF-8
    /// - [`Error::Io`] if it cannot be created or canonicalized
    pub fn open_with_observer(config: StoreConfig, observer: Arc<dyn StoreObserver>) -> Result<Self> {
        let candidate = config.root.display().to_string();
        let result = Self::prepare_root(&config.root);
        let root = match result {
            Ok(root) => root,
            Err(e) => {
                observer.on_failure(Operation::Open, &candidate, &e);
                return Err(e);
            }
        };

        observer.on_success(&StoreEvent::new(Operation::Open));
        Ok(Self {
            resolver: Resolver::new(NormalizedPath::new(&root)),
            config: StoreConfig { root, ..config },
            observer,
        })
    }

    fn prepare_root(root: &std::path::Path) -> Result<PathBuf> {
        // Normalization is lossy for non-UTF-8 names.
        let absolute = config::absolutize(root)?;
        let absolute = NormalizedPath::new(absolute.to_str().ok_or(NON_UTF8_ROOT)?);
        io::ensure_dir(&absolute).map_err(|e| Error::from_fs(Operation::Open, "storage root", e))?;
        let canonical = dunce::canonicalize(absolute.to_native()).map_err(|source| Error::Io {
            operation: Operation::Open,
            id: "storage root".to_string(),
            source,
        })?;
        if canonical.to_str().is_none() {
            return Err(NON_UTF8_ROOT);
        }
        Ok(canonical)
    }

    /// The canonical storage root.
    pub fn root(&self) -> &NormalizedPath {
        self.resolver.root()
    }

    /// Effective configuration; `root` holds the canonical root.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Store `content` under a fresh identifier.
    ///
    /// Only the extension of `original_name` is kept; executable and
    /// malformed extensions are dropped. A payload exactly at the size limit
    /// is accepted.
    pub fn store(&self, content: &[u8], original_name: Option<&str>) -> Result<FileId> {
        let result = self.store_inner(content, original_name);
        self.observe(Operation::Store, original_name.unwrap_or(""), result, |id| {
            StoreEvent::new(Operation::Store).id(*id).size(content.len() as u64)
        })
    }

    fn store_inner(&self, content: &[u8], original_name: Option<&str>) -> Result<FileId> {
        let size = content.len() as u64;
        if let Some(limit) = self.config.max_file_size
            && size > limit
        {
            return Err(Error::PayloadTooLarge { size, limit });
        }

        let extension = original_name.and_then(extension_of);
        if !self.config.allows_extension(extension.as_deref()) {
            return Err(Error::ExtensionNotAllowed {
                extension: original_name
                    .and_then(resolver::raw_extension)
                    .unwrap_or_default(),
            });
        }

        let id = FileId::generate();
        let id_str = id.to_string();
        if self.locate(Operation::Store, &id)?.is_some() {
            return Err(Error::collision(&id_str));
        }

        let path = self.resolver.stored_path(&id, extension.as_deref())?;
        io::write_new(&path, content, self.config.robustness)
            .map_err(|e| Error::from_fs(Operation::Store, &id_str, e))?;
        Ok(id)
    }

    /// Read the full content of a stored file.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] for empty or malformed identifiers
    /// - [`Error::PathEscape`] when the identifier resolves outside the root,
    ///   or the matching entry is a symlink
    /// - [`Error::NotFound`] when no file matches
    /// - [`Error::Io`] when the file cannot be read
    pub fn retrieve(&self, id: &str) -> Result<Vec<u8>> {
        let result = self.retrieve_inner(id);
        self.observe(Operation::Retrieve, id, result, |(file_id, bytes)| {
            StoreEvent::new(Operation::Retrieve)
                .id(*file_id)
                .size(bytes.len() as u64)
        })
        .map(|(_, bytes)| bytes)
    }

    fn retrieve_inner(&self, id: &str) -> Result<(FileId, Vec<u8>)> {
        let (file_id, located) = self.require(Operation::Retrieve, id)?;
        let bytes = io::read_bytes(&located.path)
            .map_err(|e| Error::from_fs_lookup(Operation::Retrieve, &file_id.to_string(), e))?;
        Ok((file_id, bytes))
    }

    /// Whether a file with this identifier is stored.
    ///
    /// Malformed and escaping identifiers are errors, not `false`.
    pub fn exists(&self, id: &str) -> Result<bool> {
        let result = self.resolver.resolve_id(id).and_then(|(file_id, _)| {
            self.locate(Operation::Exists, &file_id)
                .map(|found| (file_id, found.is_some()))
        });
        self.observe(Operation::Exists, id, result, |(file_id, present)| {
            StoreEvent::new(Operation::Exists)
                .id(*file_id)
                .detail(u64::from(*present))
        })
        .map(|(_, present)| present)
    }

    /// Delete a stored file. An absent file is [`Error::NotFound`].
    pub fn delete(&self, id: &str) -> Result<()> {
        let result = self.delete_inner(id);
        self.observe(Operation::Delete, id, result, |file_id| {
            StoreEvent::new(Operation::Delete).id(*file_id).detail(1)
        })
        .map(|_| ())
    }

    /// Delete a stored file if present, returning whether anything was
    /// removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let result = match self.delete_inner(id) {
            Ok(file_id) => Ok(Some(file_id)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        };
        self.observe(Operation::Delete, id, result, |removed| {
            let event = StoreEvent::new(Operation::Delete).detail(u64::from(removed.is_some()));
            match removed {
                Some(file_id) => event.id(*file_id),
                None => event,
            }
        })
        .map(|removed| removed.is_some())
    }

    fn delete_inner(&self, id: &str) -> Result<FileId> {
        let (file_id, located) = self.require(Operation::Delete, id)?;
        io::remove_file(&located.path)
            .map_err(|e| Error::from_fs_lookup(Operation::Delete, &file_id.to_string(), e))?;
        Ok(file_id)
    }

    /// Metadata for one stored file.
    pub fn stat(&self, id: &str) -> Result<StoredFile> {
        let result = self.require(Operation::Stat, id).map(|(file_id, located)| StoredFile {
            id: file_id,
            extension: located.extension,
            size_bytes: located.size_bytes,
            stored_path: located.path.to_native(),
        });
        self.observe(Operation::Stat, id, result, |file| {
            StoreEvent::new(Operation::Stat).id(file.id).size(file.size_bytes)
        })
    }

    /// All stored files, sorted by identifier then extension.
    ///
    /// Temp files, directories, symlinks and names that `store` could not
    /// have produced are skipped.
    pub fn list(&self) -> Result<Vec<StoredFile>> {
        let result = self.list_inner();
        self.observe(Operation::List, "", result, |files| {
            StoreEvent::new(Operation::List).detail(files.len() as u64)
        })
    }

    fn list_inner(&self) -> Result<Vec<StoredFile>> {
        let io_error = |source: std::io::Error| Error::Io {
            operation: Operation::List,
            id: "storage root".to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(self.root().to_native()).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Some((id, extension)) = resolver::parse_stored_name(&name) else {
                continue;
            };
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(e)),
            };
            if !metadata.is_file() {
                continue;
            }
            files.push(StoredFile {
                id,
                extension,
                size_bytes: metadata.len(),
                stored_path: self.resolver.resolve(&name)?.to_native(),
            });
        }

        files.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.extension.cmp(&b.extension)));
        Ok(files)
    }

    /// Resolve a client request path such as `/images/logo.png` to a native
    /// path inside the root. No filesystem access is performed.
    pub fn resolve_request(&self, request_path: &str) -> Result<PathBuf> {
        let result = self
            .resolver
            .resolve_request(request_path)
            .map(|path| path.to_native());
        self.observe(Operation::Resolve, request_path, result, |_| {
            StoreEvent::new(Operation::Resolve)
        })
    }

    /// Resolve `id` and find its file, or fail with [`Error::NotFound`].
    fn require(&self, operation: Operation, id: &str) -> Result<(FileId, Located)> {
        let (file_id, _) = self.resolver.resolve_id(id)?;
        let located = self
            .locate(operation, &file_id)?
            .ok_or_else(|| Error::NotFound {
                id: file_id.to_string(),
            })?;
        Ok((file_id, located))
    }

    /// Find the entry stored under `id`.
    ///
    /// An entry matches when its name is the id alone or the id followed by
    /// one `.<ext>` of the shape `store` writes, the same names `list`
    /// reports. When several match, the lexicographically smallest name wins.
    fn locate(&self, operation: Operation, id: &FileId) -> Result<Option<Located>> {
        let id_str = id.to_string();
        let io_error = |source: std::io::Error| Error::Io {
            operation,
            id: id_str.clone(),
            source,
        };

        let mut best: Option<(String, Option<String>, u64)> = None;
        for entry in fs::read_dir(self.root().to_native()).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let extension = match resolver::parse_stored_name(&name) {
                Some((parsed, extension)) if parsed == *id => extension,
                _ => continue,
            };

            let metadata = match fs::symlink_metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(e)),
            };
            if metadata.file_type().is_symlink() {
                return Err(Error::PathEscape {
                    candidate: id.to_string(),
                });
            }
            if !metadata.is_file() {
                continue;
            }
            if best.as_ref().is_none_or(|(current, _, _)| name < *current) {
                best = Some((name, extension, metadata.len()));
            }
        }

        let Some((name, extension, size_bytes)) = best else {
            return Ok(None);
        };
        Ok(Some(Located {
            path: self.resolver.resolve(&name)?,
            extension,
            size_bytes,
        }))
    }

    /// Report `result` to the observer and hand it back.
    fn observe<T>(
        &self,
        operation: Operation,
        candidate: &str,
        result: Result<T>,
        event: impl FnOnce(&T) -> StoreEvent,
    ) -> Result<T> {
        match &result {
            Ok(value) => self.observer.on_success(&event(value)),
            Err(e) => self.observer.on_failure(operation, candidate, e),
        }
        result
    }
}
