//! Store configuration
//!
//! A [`StoreConfig`] can be built in code or loaded from a TOML, JSON or
//! YAML file through [`depot_fs::ConfigStore`]:
//!
//! ```toml
//! root = "uploads"
//! max_file_size = 10485760   # or "unlimited"
//! allowed_extensions = ["png", "jpg", "pdf"]
//!
//! [robustness]
//! enable_fsync = true
//! ```

use std::path::{Path, PathBuf};

use depot_fs::{ConfigStore, NormalizedPath, RobustnessConfig};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default payload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for a [`FileStore`](crate::FileStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage root. Relative roots are resolved against the working
    /// directory, or against the config file's directory when loaded.
    pub root: PathBuf,

    /// Maximum payload size in bytes; `None` disables the check.
    #[serde(with = "size_limit")]
    pub max_file_size: Option<u64>,

    /// Lowercase extensions accepted by `store`; empty accepts any.
    pub allowed_extensions: Vec<String>,

    pub robustness: RobustnessConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("uploads"),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            allowed_extensions: Vec::new(),
            robustness: RobustnessConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Load configuration from a file, resolving a relative root against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let path = absolutize(path)?;
        let mut config: Self = ConfigStore::new()
            .load(&NormalizedPath::new(&path))
            .map_err(Error::Config)?;
        config.anchor_root(&path);
        Ok(config)
    }

    /// Like [`StoreConfig::load`], but a missing file yields `Ok(None)`.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        let path = absolutize(path)?;
        let loaded: Option<Self> = ConfigStore::new()
            .load_optional(&NormalizedPath::new(&path))
            .map_err(Error::Config)?;
        Ok(loaded.map(|mut config| {
            config.anchor_root(&path);
            config
        }))
    }

    /// Save configuration to a file in the format implied by its extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::with_robustness(self.robustness)
            .save(&NormalizedPath::new(absolutize(path)?), self)
            .map_err(Error::Config)
    }

    /// Whether `extension` passes the allowlist.
    pub fn allows_extension(&self, extension: Option<&str>) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        extension.is_some_and(|ext| self.allowed_extensions.iter().any(|allowed| allowed == ext))
    }

    fn anchor_root(&mut self, config_path: &Path) {
        if self.root.is_relative() {
            if let Some(dir) = config_path.parent() {
                self.root = dir.join(&self.root);
            }
        }
    }
}

/// Make `path` absolute without touching the filesystem.
///
/// Needed before handing a path to [`NormalizedPath`], which drops leading
/// `..` segments of relative paths.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::Config(depot_fs::Error::io(path, e)))
}

/// Serde adapter for `Option<u64>` that spells `None` as `"unlimited"`,
/// since TOML has no null.
mod size_limit {
    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::Serializer;
    use std::fmt;

    const UNLIMITED: &str = "unlimited";

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(limit) => serializer.serialize_u64(*limit),
            None => serializer.serialize_str(UNLIMITED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        struct LimitVisitor;

        impl<'de> Visitor<'de> for LimitVisitor {
            type Value = Option<u64>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a byte count or \"{UNLIMITED}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Some(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(Some)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == UNLIMITED {
                    Ok(None)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }
        }

        deserializer.deserialize_any(LimitVisitor)
    }
}
