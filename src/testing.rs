//! Testing utilities for dirtag
//!
//! This module provides [`TestDir`], a scratch directory paired with an
//! in-memory filesystem that controls creation times, so tests get
//! deterministic identifiers while sidecar files still hit the real disk.
//!
//! Only available when compiled with `cfg(test)`.

use crate::fs::{Identifier, MemoryFileSystem};
use crate::loader::LoaderOptions;
use crate::workspace::Workspace;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Scratch directory whose listing comes from a [`MemoryFileSystem`]
///
/// The temp directory is removed when the wrapper is dropped.
///
/// # Examples
/// ```ignore
/// let dir = TestDir::with_files(&[("a.txt", 10), ("b.txt", 10)]);
/// let workspace = dir.workspace();
/// assert_eq!(workspace.session().unwrap().catalog().len(), 2);
/// ```
pub struct TestDir {
    dir: TempDir,
    fs: Arc<MemoryFileSystem>,
}

impl TestDir {
    /// Create an empty test directory
    ///
    /// # Panics
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_dir(dir.path(), 0);
        Self { dir, fs }
    }

    /// Create a test directory holding files with the given creation times
    #[must_use]
    pub fn with_files(files: &[(&str, Identifier)]) -> Self {
        let test_dir = Self::new();
        for (name, created) in files {
            test_dir.fs.add_file(test_dir.path().join(name), *created);
        }
        test_dir
    }

    /// Add a subdirectory
    pub fn add_dir(&self, name: &str, created: Identifier) {
        self.fs.add_dir(self.path().join(name), created);
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn fs(&self) -> &MemoryFileSystem {
        &self.fs
    }

    /// A workspace already navigated to this directory
    ///
    /// # Panics
    /// Panics if the directory cannot be loaded.
    #[must_use]
    pub fn workspace(&self) -> Workspace {
        let mut workspace = Workspace::new(self.fs.clone(), LoaderOptions::default());
        workspace
            .go_to(self.path())
            .expect("Failed to load test directory")
            .expect("Test directory is not a directory");
        workspace
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test file with default content
///
/// # Errors
/// Returns an `io::Error` if the file cannot be created or written.
pub fn create_test_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(b"test content")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_dir_workspace() {
        let dir = TestDir::with_files(&[("a.txt", 10), ("b.txt", 10)]);
        let workspace = dir.workspace();
        let ids: Vec<_> = workspace
            .session()
            .unwrap()
            .catalog()
            .iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn test_create_test_file() {
        let dir = TestDir::new();
        let path = dir.path().join("real.txt");
        create_test_file(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"test content");
    }
}
