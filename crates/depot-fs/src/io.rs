//! Atomic I/O operations
//!
//! Two write strategies share the same temp-file discipline:
//! [`write_atomic`] replaces the destination with a rename, while
//! [`write_new`] publishes with a hard link and refuses to overwrite.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{Error, NormalizedPath, Result};

/// Knobs for how hard the writers try to make data durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessConfig {
    /// Call `sync_all` on the temp file before it is published.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self { enable_fsync: true }
    }
}

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Sibling temp path in the same directory, so publishing never crosses
/// filesystems.
fn temp_path_for(native_path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    );
    native_path.with_file_name(temp_name)
}

/// Create the parent directory and refuse to continue if it is a symlink.
fn prepare_parent(native_path: &Path) -> Result<()> {
    let Some(parent) = native_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    let metadata = fs::symlink_metadata(parent).map_err(|e| Error::io(parent, e))?;
    if metadata.file_type().is_symlink() {
        return Err(Error::SymlinkInPath {
            path: parent.to_path_buf(),
        });
    }
    Ok(())
}

/// Write `content` to a fresh temp file next to `native_path`.
fn write_temp(native_path: &Path, content: &[u8], robustness: RobustnessConfig) -> Result<PathBuf> {
    let temp_path = temp_path_for(native_path);
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = temp_file.write_all(content).and_then(|()| {
        if robustness.enable_fsync {
            temp_file.sync_all()
        } else {
            Ok(())
        }
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }
    Ok(temp_path)
}

/// Write content atomically to a file, replacing any existing file.
///
/// Uses write-to-temp-then-rename so readers never observe a partial write.
/// A symlink at the destination is replaced, not followed.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], robustness: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();
    prepare_parent(&native_path)?;

    let temp_path = write_temp(&native_path, content, robustness)?;
    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }
    Ok(())
}

/// Write content to a file that must not exist yet.
///
/// The content is written and synced to a temp file first, then published
/// with a hard link, which fails atomically if the destination appeared in
/// the meantime. Returns [`Error::AlreadyExists`] instead of overwriting.
pub fn write_new(path: &NormalizedPath, content: &[u8], robustness: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();
    prepare_parent(&native_path)?;

    if fs::symlink_metadata(&native_path).is_ok() {
        return Err(Error::AlreadyExists { path: native_path });
    }

    let temp_path = write_temp(&native_path, content, robustness)?;
    let linked = fs::hard_link(&temp_path, &native_path);
    if let Err(e) = fs::remove_file(&temp_path) {
        tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove temp file");
    }
    match linked {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(Error::AlreadyExists { path: native_path })
        }
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Read the full content of a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Remove a single file. Directories are not removed.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Make sure `path` exists and is a directory, creating it if absent.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    match fs::metadata(&native_path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory { path: native_path }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
        }
        Err(e) => Err(Error::io(&native_path, e)),
    }
}
