//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Large files are created sparse with `File::set_len`, so multi-gigabyte
/// sizes cost no disk space. The tree is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a directory, creating parents as needed.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a file filled with `len` bytes of data.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, len: usize) -> PathBuf {
        let full_path = self.prepare(path);
        fs::write(&full_path, vec![b'x'; len]).expect("Failed to write file");
        full_path
    }

    /// Add a sparse file whose reported length is `len` bytes.
    pub fn add_sparse(&self, path: &str, len: u64) -> PathBuf {
        let full_path = self.prepare(path);
        let file = File::create(&full_path).expect("Failed to create file");
        file.set_len(len).expect("Failed to set file length");
        full_path
    }

    /// Add a symlink at `path` pointing at `target`.
    #[cfg(unix)]
    pub fn add_symlink(&self, path: &str, target: &Path) -> PathBuf {
        let full_path = self.prepare(path);
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    fn prepare(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
