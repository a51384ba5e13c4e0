//! `std::fs` backed implementation of [`FileSystem`]

use super::time::{Identifier, filetime_from_system};
use super::{EntryKind, FileSystem, ListOptions, RawEntry};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// The real filesystem
///
/// Listings are sorted by name so that identifier disambiguation sees entries
/// in the same order on every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native filesystem handle
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for NativeFileSystem {
    fn list_dir(&self, dir: &Path, options: &ListOptions) -> io::Result<Vec<RawEntry>> {
        let mut entries = Vec::new();

        for item in fs::read_dir(dir)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().into_owned();
            if !options.includes(&name) {
                continue;
            }

            // Symlinks are followed; a dangling link falls back to its own metadata
            let metadata = match fs::metadata(item.path()).or_else(|_| item.metadata()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(entry = %name, error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let modified = metadata.modified()?;
            // Birth time is not reported everywhere; last-write time stands in
            let created = metadata.created().unwrap_or(modified);

            entries.push(RawEntry {
                name,
                dir: dir.to_path_buf(),
                modified: DateTime::<Utc>::from(modified),
                created: filetime_from_system(created),
                kind: if metadata.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn set_created(&self, path: &Path, created: Identifier) -> io::Result<()> {
        set_creation_time(path, created)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(windows)]
fn set_creation_time(path: &Path, created: Identifier) -> io::Result<()> {
    use super::time::system_from_filetime;
    use std::fs::{FileTimes, OpenOptions};
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    // Required to open a directory handle
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;

    let file = OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)?;
    file.set_times(FileTimes::new().set_created(system_from_filetime(created)))
}

#[cfg(target_os = "macos")]
fn set_creation_time(path: &Path, created: Identifier) -> io::Result<()> {
    use super::time::system_from_filetime;
    use std::fs::{File, FileTimes};
    use std::os::macos::fs::FileTimesExt;

    let file = File::open(path)?;
    file.set_times(FileTimes::new().set_created(system_from_filetime(created)))
}

#[cfg(not(any(windows, target_os = "macos")))]
fn set_creation_time(path: &Path, _created: Identifier) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!(
            "cannot rewrite creation time of '{}' on this platform",
            path.display()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("tags.dirtag")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let options = ListOptions::for_sidecar("tags.dirtag", false);
        let entries = NativeFileSystem::new().list_dir(dir.path(), &options).unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
        assert_eq!(entries[2].kind, EntryKind::Directory);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].dir, dir.path());
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = NativeFileSystem::new().list_dir(&missing, &ListOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_is_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        File::create(&file).unwrap();

        let fs = NativeFileSystem::new();
        assert!(!fs.is_dir(&file));
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.is_dir(&dir.path().join("missing")));
    }

    #[test]
    fn test_hidden_temp_looking_names_are_listed() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join(".tmprc")).unwrap();
        File::create(dir.path().join(".dirtag-x1Y2z3")).unwrap();

        let options = ListOptions::for_sidecar("tags.dirtag", true);
        let entries = NativeFileSystem::new().list_dir(dir.path(), &options).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".tmprc"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_lists_as_directory() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let entries = NativeFileSystem::new()
            .list_dir(dir.path(), &ListOptions::default())
            .unwrap();
        let kinds: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("dangling", EntryKind::File),
                ("link", EntryKind::Directory),
                ("real", EntryKind::Directory),
            ]
        );
        assert_eq!(entries[1].created, entries[2].created);
        assert_eq!(entries[1].modified, entries[2].modified);
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    #[test]
    fn test_set_created_unsupported() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        File::create(&file).unwrap();

        let err = NativeFileSystem::new().set_created(&file, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
