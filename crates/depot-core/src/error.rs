//! Error types for depot-core
//!
//! Messages never include absolute filesystem paths: they may be relayed to
//! untrusted callers by a hosting layer. I/O failures carry the operation and
//! the identifier instead.

use crate::observer::Operation;

/// Result type for depot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depot-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty, whitespace-only or otherwise malformed identifier
    #[error("Invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },

    /// The candidate resolves outside the storage root
    #[error("Path escapes storage root: {candidate:?}")]
    PathEscape { candidate: String },

    /// Well-formed identifier with no matching file
    #[error("File not found: {id}")]
    NotFound { id: String },

    /// Payload exceeds the configured maximum size
    #[error("Payload too large: {size} bytes (max: {limit})")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// Extension is not in the configured allowlist
    #[error("Extension not allowed: {extension:?}")]
    ExtensionNotAllowed { extension: String },

    /// Underlying filesystem failure
    #[error("I/O error during {operation} of {id}: {source}")]
    Io {
        operation: Operation,
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// Invariant violation, such as an identifier collision
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// The configured storage root cannot host a store
    #[error("Storage root {reason}")]
    InvalidRoot { reason: &'static str },

    /// Failure loading or saving store configuration
    #[error(transparent)]
    Config(depot_fs::Error),
}

/// Coarse classification of [`Error`] for hosting layers.
///
/// Stable across variants that carry different context, so a transport can
/// map kinds onto responses without matching on fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    PathEscape,
    NotFound,
    PayloadTooLarge,
    ExtensionNotAllowed,
    Io,
    Internal,
    InvalidRoot,
    Config,
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            reason: reason.into(),
        }
    }

    pub(crate) fn collision(id: &str) -> Self {
        Self::Internal {
            message: format!("identifier collision for {id}"),
        }
    }

    /// Translate a depot-fs failure, dropping the path it carries.
    pub(crate) fn from_fs(operation: Operation, id: &str, err: depot_fs::Error) -> Self {
        match err {
            depot_fs::Error::Io { source, .. } => Self::Io {
                operation,
                id: id.to_string(),
                source,
            },
            depot_fs::Error::SymlinkInPath { .. } => Self::PathEscape {
                candidate: id.to_string(),
            },
            depot_fs::Error::AlreadyExists { .. } => Self::collision(id),
            depot_fs::Error::NotADirectory { .. } => Self::InvalidRoot {
                reason: "is not a directory",
            },
            other => Self::Config(other),
        }
    }

    /// Like [`Error::from_fs`], but a vanished file becomes [`Error::NotFound`].
    ///
    /// Covers the window between lookup and access when another caller
    /// deletes the same file.
    pub(crate) fn from_fs_lookup(operation: Operation, id: &str, err: depot_fs::Error) -> Self {
        if err.io_kind() == Some(std::io::ErrorKind::NotFound) {
            Self::NotFound { id: id.to_string() }
        } else {
            Self::from_fs(operation, id, err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::PathEscape { .. } => ErrorKind::PathEscape,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::ExtensionNotAllowed { .. } => ErrorKind::ExtensionNotAllowed,
            Self::Io { .. } => ErrorKind::Io,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::InvalidRoot { .. } => ErrorKind::InvalidRoot,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the caller's input caused the failure.
    ///
    /// `NotFound` counts as a client error; everything filesystem- or
    /// configuration-related does not.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidIdentifier
                | ErrorKind::PathEscape
                | ErrorKind::NotFound
                | ErrorKind::PayloadTooLarge
                | ErrorKind::ExtensionNotAllowed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn from_fs_drops_paths() {
        let err = Error::from_fs(
            Operation::Retrieve,
            "0123",
            depot_fs::Error::io(
                PathBuf::from("/srv/secret/location/0123"),
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.to_string().contains("/srv/secret"));
    }

    #[test]
    fn from_fs_lookup_maps_vanished_files() {
        let err = Error::from_fs_lookup(
            Operation::Delete,
            "0123",
            depot_fs::Error::io(
                PathBuf::from("/srv/0123"),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ),
        );
        assert!(matches!(err, Error::NotFound { ref id } if id == "0123"));
    }

    #[test]
    fn symlink_rejections_are_escapes() {
        let err = Error::from_fs(
            Operation::Store,
            "0123",
            depot_fs::Error::SymlinkInPath {
                path: PathBuf::from("/srv"),
            },
        );
        assert_eq!(err.kind(), ErrorKind::PathEscape);
    }

    #[test]
    fn client_errors() {
        assert!(Error::invalid("empty").is_client_error());
        assert!(Error::NotFound { id: "x".into() }.is_client_error());
        assert!(!Error::collision("x").is_client_error());
        assert!(
            !Error::InvalidRoot {
                reason: "is not a directory"
            }
            .is_client_error()
        );
    }
}
