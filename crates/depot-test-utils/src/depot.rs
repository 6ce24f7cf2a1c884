//! [`TestDepot`] builder for file store test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use depot_core::{FileStore, StoreConfig};
use depot_fs::RobustnessConfig;
use tempfile::TempDir;

use crate::RecordingObserver;

/// A [`FileStore`] rooted in a fresh temporary directory.
///
/// The store root is `<tempdir>/store`, so tests can plant files next to the
/// root (in [`TestDepot::outside`]) to exercise containment.
///
/// # Example
///
/// ```rust,no_run
/// use depot_test_utils::TestDepot;
///
/// let depot = TestDepot::new();
/// let id = depot.store().store(b"hello", Some("a.txt")).unwrap();
/// depot.assert_file_exists(&format!("{id}.txt"));
/// ```
pub struct TestDepot {
    temp_dir: TempDir,
    store: FileStore,
    observer: Arc<RecordingObserver>,
}

impl Default for TestDepot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDepot {
    /// Default configuration, with fsync disabled to keep tests fast.
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Adjust the configuration before the store is opened. The root is
    /// always overridden with the temporary one.
    pub fn with_config(configure: impl FnOnce(StoreConfig) -> StoreConfig) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base = StoreConfig::new(temp_dir.path().join("store"))
            .with_robustness(RobustnessConfig { enable_fsync: false });
        let config = StoreConfig {
            root: temp_dir.path().join("store"),
            ..configure(base)
        };

        let observer = Arc::new(RecordingObserver::new());
        let store = FileStore::open_with_observer(config, observer.clone())
            .expect("TestDepot: failed to open store");
        Self {
            temp_dir,
            store,
            observer,
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn observer(&self) -> &RecordingObserver {
        &self.observer
    }

    /// Canonical storage root.
    pub fn root(&self) -> PathBuf {
        self.store.root().to_native()
    }

    /// The temporary directory containing the root.
    pub fn outside(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file directly into the root, bypassing the store.
    pub fn plant(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Sorted names of every entry in the root.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `name` exists in the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if it does not.
    pub fn assert_file_exists(&self, name: &str) {
        let full_path = self.root().join(name);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `name` does **not** exist in the root.
    pub fn assert_file_not_exists(&self, name: &str) {
        let full_path = self.root().join(name);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
