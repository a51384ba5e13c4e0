//! In-memory filesystem
//!
//! Deterministic stand-in for [`NativeFileSystem`](super::NativeFileSystem).
//! Creation times are plain integers, so collision handling can be exercised
//! without depending on what the host filesystem reports.

use super::time::Identifier;
use super::{EntryKind, FileSystem, ListOptions, RawEntry};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Node {
    kind: EntryKind,
    created: Identifier,
    modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    /// Paths whose creation time cannot be rewritten
    locked: BTreeSet<PathBuf>,
}

/// In-memory filesystem with controllable creation times
///
/// # Examples
///
/// ```
/// use dirtag::fs::{FileSystem, ListOptions, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.add_dir("/data", 1);
/// fs.add_file("/data/a.txt", 100);
///
/// let entries = fs.list_dir(Path::new("/data"), &ListOptions::default()).unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].created, 100);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<State>,
}

impl MemoryFileSystem {
    /// Create an empty in-memory filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-update; the map is still usable
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn insert(&self, path: impl AsRef<Path>, kind: EntryKind, created: Identifier) {
        self.state().nodes.insert(
            path.as_ref().to_path_buf(),
            Node {
                kind,
                created,
                modified: DateTime::<Utc>::UNIX_EPOCH,
            },
        );
    }

    /// Add a file with the given creation time
    pub fn add_file(&self, path: impl AsRef<Path>, created: Identifier) {
        self.insert(path, EntryKind::File, created);
    }

    /// Add a directory with the given creation time
    pub fn add_dir(&self, path: impl AsRef<Path>, created: Identifier) {
        self.insert(path, EntryKind::Directory, created);
    }

    /// Remove a node
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.state().nodes.remove(path.as_ref());
    }

    /// Make creation-time rewrites on `path` fail with `PermissionDenied`
    pub fn lock_creation_time(&self, path: impl AsRef<Path>) {
        self.state().locked.insert(path.as_ref().to_path_buf());
    }

    /// Current creation time of `path`
    #[must_use]
    pub fn created(&self, path: impl AsRef<Path>) -> Option<Identifier> {
        self.state().nodes.get(path.as_ref()).map(|n| n.created)
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_dir(&self, dir: &Path, options: &ListOptions) -> io::Result<Vec<RawEntry>> {
        let state = self.state();
        match state.nodes.get(dir) {
            Some(node) if node.kind == EntryKind::Directory => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", dir.display()),
                ));
            }
        }

        let mut entries: Vec<RawEntry> = state
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .filter_map(|(path, node)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                options.includes(&name).then(|| RawEntry {
                    name,
                    dir: dir.to_path_buf(),
                    modified: node.modified,
                    created: node.created,
                    kind: node.kind,
                })
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn set_created(&self, path: &Path, created: Identifier) -> io::Result<()> {
        let mut state = self.state();
        if state.locked.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("creation time of '{}' is read-only", path.display()),
            ));
        }
        match state.nodes.get_mut(path) {
            Some(node) => {
                node.created = created;
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such entry: {}", path.display()),
            )),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state()
            .nodes
            .get(path)
            .is_some_and(|n| n.kind == EntryKind::Directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/root", 1);
        fs.add_file("/root/b", 20);
        fs.add_file("/root/a", 10);
        fs.add_dir("/root/sub", 30);
        fs.add_file("/root/sub/nested", 40);
        fs
    }

    #[test]
    fn test_list_only_direct_children_sorted() {
        let fs = sample();
        let entries = fs.list_dir(Path::new("/root"), &ListOptions::default()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "sub"]);
        assert_eq!(entries[2].kind, EntryKind::Directory);
    }

    #[test]
    fn test_list_non_directory_fails() {
        let fs = sample();
        let err = fs.list_dir(Path::new("/root/a"), &ListOptions::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_set_created_and_lock() {
        let fs = sample();
        fs.set_created(Path::new("/root/a"), 99).unwrap();
        assert_eq!(fs.created("/root/a"), Some(99));

        fs.lock_creation_time("/root/b");
        let err = fs.set_created(Path::new("/root/b"), 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(fs.created("/root/b"), Some(20));
    }

    #[test]
    fn test_is_dir_and_remove() {
        let fs = sample();
        assert!(fs.is_dir(Path::new("/root/sub")));
        assert!(!fs.is_dir(Path::new("/root/a")));
        fs.remove("/root/a");
        assert_eq!(fs.created("/root/a"), None);
    }
}
