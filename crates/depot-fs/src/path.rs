//! Normalized path handling and containment checks
//!
//! All normalization here is lexical. `..` segments are resolved against the
//! preceding segment without consulting the filesystem, which keeps the
//! containment check deterministic and free of I/O.

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Construction collapses empty and `.` segments and resolves `..`
/// lexically. For absolute paths a `..` at the root is clamped to the root;
/// for relative paths a leading `..` is dropped. A leading `//` network
/// prefix is preserved, as is a drive prefix (`C:`) on Windows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, then re-normalize.
    ///
    /// Follows path-join semantics: an absolute segment replaces the base
    /// entirely, so joining `/etc/passwd` onto `/srv/files` yields
    /// `/etc/passwd`. Dot segments in `segment` are resolved against the
    /// base.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if segment_normalized.is_empty() || segment_normalized == "." {
            return self.clone();
        }
        if !split_prefix(&segment_normalized).0.is_empty() {
            return Self {
                inner: clean(&segment_normalized),
            };
        }
        let joined = if self.inner.is_empty() {
            segment_normalized
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Whether the path carries a root: `/`, `//`, or a drive prefix on Windows.
    pub fn is_absolute(&self) -> bool {
        !split_prefix(&self.inner).0.is_empty()
    }

    /// Iterate over the path's segments, excluding its root prefix.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        split_prefix(&self.inner)
            .1
            .split('/')
            .filter(|s| !s.is_empty())
    }

    /// Segment-aware prefix test.
    ///
    /// Returns true when `base` equals this path or is one of its ancestors.
    /// Whole segments are compared, so `/data/cdn_other/x` does not start
    /// with `/data/cdn`.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        if split_prefix(&self.inner).0 != split_prefix(&base.inner).0 {
            return false;
        }
        let mut ours = self.segments();
        base.segments().all(|theirs| ours.next() == Some(theirs))
    }

    /// The part of this path below `base`, or `None` if `base` does not
    /// contain it. Returns an empty relative path when both are equal.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        if !self.starts_with(base) {
            return None;
        }
        let rest: Vec<&str> = self.segments().skip(base.segments().count()).collect();
        Some(Self {
            inner: rest.join("/"),
        })
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Split a forward-slash path into its root prefix and the remainder.
///
/// The prefix is `//` for network paths, `/` for absolute paths and empty
/// for relative paths. On Windows `X:` or `X:/` is a drive prefix; elsewhere
/// `c:foo` is an ordinary relative name.
fn split_prefix(path: &str) -> (&str, &str) {
    if path.starts_with("//") && !path.starts_with("///") {
        path.split_at(2)
    } else if path.starts_with('/') {
        path.split_at(1)
    } else if let Some(len) = drive_prefix_len(path) {
        path.split_at(len)
    } else {
        ("", path)
    }
}

#[cfg(windows)]
fn drive_prefix_len(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(if bytes.get(2) == Some(&b'/') { 3 } else { 2 })
    } else {
        None
    }
}

#[cfg(not(windows))]
fn drive_prefix_len(_path: &str) -> Option<usize> {
    None
}

fn clean(path: &str) -> String {
    let (prefix, rest) = split_prefix(path);
    let mut parts: Vec<&str> = Vec::new();
    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                // Clamped at the root for absolute paths, dropped for relative ones
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("{}{}", prefix, parts.join("/"))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefix_variants() {
        assert_eq!(split_prefix("/a/b"), ("/", "a/b"));
        assert_eq!(split_prefix("//srv/share"), ("//", "srv/share"));
        assert_eq!(split_prefix("a/b"), ("", "a/b"));
    }

    #[cfg(windows)]
    #[test]
    fn split_prefix_drives() {
        assert_eq!(split_prefix("C:/data"), ("C:/", "data"));
        assert_eq!(split_prefix("C:data"), ("C:", "data"));
    }

    #[cfg(not(windows))]
    #[test]
    fn split_prefix_colon_names_are_relative() {
        assert_eq!(split_prefix("C:/data"), ("", "C:/data"));
        assert_eq!(split_prefix("c:foo.png"), ("", "c:foo.png"));
    }

    #[test]
    fn clean_is_idempotent() {
        for input in ["/a/./b/../c", "../../x", "//srv/a/..", "C:/a/../../b", ""] {
            let once = clean(input);
            assert_eq!(clean(&once), once, "input: {input}");
        }
    }
}
