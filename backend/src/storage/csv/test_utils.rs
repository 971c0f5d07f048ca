/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// Every test gets its own temporary directory that is removed when the
/// environment drops, even if the test panics.
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::product_repository::InventoryStore;

/// RAII test environment around a temporary directory
pub struct TestEnvironment {
    /// Kept alive until drop so the directory is not removed early
    _temp_dir: TempDir,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("inventory_test_")?;
        let base_path = temp_dir.path().to_path_buf();

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Path of a file inside the environment; nothing is created
    pub fn path(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative)
    }

    /// Write `contents` to a file inside the environment and return its path
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create test directory");
        }
        fs::write(&path, contents).expect("write test file");
        path
    }

    /// Open a store on a file inside the environment
    pub fn open_store(&self, relative: &str) -> InventoryStore {
        InventoryStore::open(self.path(relative))
    }

    /// Names of all entries directly under the base directory, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.base_path)
            .expect("read test directory")
            .map(|entry| {
                entry
                    .expect("read directory entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        names
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        // TempDir removes the directory itself
        if std::env::var("INVENTORY_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}
