//! Identifier and path resolution
//!
//! Every filesystem path depot-core touches is produced here. Resolution is
//! purely lexical and performs no I/O: the candidate is joined onto the
//! root with path-join semantics, normalized, and accepted only if the
//! result equals or descends from the root when compared segment by segment.

use depot_fs::NormalizedPath;

use crate::{Error, FileId, Result};

/// Longest extension preserved from an original file name.
const MAX_EXTENSION_LEN: usize = 16;

/// Extensions that are dropped rather than preserved on stored files.
const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "msi", "dll", "so", "sh", "ps1", "scr", "jar", "vbs",
];

/// Maps candidates onto a single storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    root: NormalizedPath,
}

impl Resolver {
    /// Create a resolver for `root`, which should already be absolute.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Resolve `candidate` to a normalized path inside the root.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] for empty, whitespace-only or
    ///   NUL-containing candidates
    /// - [`Error::PathEscape`] when the normalized result is neither the root
    ///   nor below it, including absolute candidates outside the root
    pub fn resolve(&self, candidate: &str) -> Result<NormalizedPath> {
        validate_candidate(candidate)?;

        let resolved = self.root.join(candidate);
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(Error::PathEscape {
                candidate: candidate.to_string(),
            })
        }
    }

    /// Resolve `candidate` and require it to name a file identifier directly
    /// under the root.
    ///
    /// Containment is checked first, so an escaping candidate is always a
    /// [`Error::PathEscape`] even if it is also malformed.
    pub fn resolve_id(&self, candidate: &str) -> Result<(FileId, NormalizedPath)> {
        let resolved = self.resolve(candidate)?;
        let relative = resolved
            .strip_prefix(&self.root)
            .ok_or_else(|| Error::PathEscape {
                candidate: candidate.to_string(),
            })?;

        let mut segments = relative.segments();
        let id = match (segments.next(), segments.next()) {
            (Some(name), None) => FileId::parse(name)
                .ok_or_else(|| Error::invalid("expected 32 lowercase hex characters"))?,
            (None, _) => return Err(Error::invalid("identifier names the storage root")),
            (Some(_), Some(_)) => {
                return Err(Error::invalid("identifier must be a single path segment"));
            }
        };
        Ok((id, resolved))
    }

    /// Resolve a client request path such as `/images/logo.png`.
    ///
    /// Leading separators are stripped, so the request is always interpreted
    /// relative to the root; `..` segments are still subject to the
    /// containment check. Requests naming the root itself are rejected.
    pub fn resolve_request(&self, request_path: &str) -> Result<NormalizedPath> {
        validate_candidate(request_path)?;
        let relative = request_path.trim_start_matches(['/', '\\']);
        if relative.trim().is_empty() {
            return Err(Error::invalid("request path names the storage root"));
        }

        let resolved = self.resolve(relative)?;
        if resolved == self.root {
            return Err(Error::invalid("request path names the storage root"));
        }
        Ok(resolved)
    }

    /// Destination for a file with the given id and optional extension.
    pub fn stored_path(&self, id: &FileId, extension: Option<&str>) -> Result<NormalizedPath> {
        self.resolve(&stored_name(id, extension))
    }
}

/// File name used on disk: `<id>` or `<id>.<ext>`.
pub(crate) fn stored_name(id: &FileId, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

fn validate_candidate(candidate: &str) -> Result<()> {
    if candidate.trim().is_empty() {
        return Err(Error::invalid("identifier is empty"));
    }
    if candidate.contains('\0') {
        return Err(Error::invalid("identifier contains a NUL byte"));
    }
    Ok(())
}

/// The raw extension of a caller-supplied name, lowercased, before any
/// policy is applied.
pub(crate) fn raw_extension(original_name: &str) -> Option<String> {
    let base = original_name.rsplit(['/', '\\']).next()?;
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Derive the extension to preserve from a caller-supplied file name.
///
/// Only the final component of the name is considered, and only the text
/// after its last dot. Returns `None` for dot-files, names without an
/// extension, extensions that are not short ASCII alphanumerics, and
/// executable extensions.
pub fn extension_of(original_name: &str) -> Option<String> {
    let ext = raw_extension(original_name)?;
    if ext.len() > MAX_EXTENSION_LEN || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    if EXECUTABLE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(ext)
}

/// Split an on-disk name into its identifier and optional extension.
///
/// Returns `None` for anything `store` could not have produced.
pub(crate) fn parse_stored_name(name: &str) -> Option<(FileId, Option<String>)> {
    let (id_part, ext) = match name.split_once('.') {
        Some((id_part, ext)) => (id_part, Some(ext)),
        None => (name, None),
    };
    let id = FileId::parse(id_part)?;
    match ext {
        None => Some((id, None)),
        Some(ext)
            if !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            Some((id, Some(ext.to_string())))
        }
        Some(_) => None,
    }
}
