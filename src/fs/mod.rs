//! Filesystem collaborator
//!
//! The tagging core never touches `std::fs` directly. Everything it needs from
//! the filesystem goes through the [`FileSystem`] trait:
//!
//! - listing one directory (name, parent, last-write time, creation time, kind)
//! - directory checks for navigation targets
//! - rewriting an entry's creation time after identifier disambiguation
//!
//! [`NativeFileSystem`] is the real implementation. `MemoryFileSystem` is an
//! in-memory one with fully controllable timestamps, kept out of the docs and
//! used only by unit and integration tests.

#[doc(hidden)]
pub mod memory;
pub mod native;
pub mod time;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

#[doc(hidden)]
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use time::{Identifier, filetime_from_system, system_from_filetime};

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One raw directory listing record, before identifiers are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// File or directory name (last path component)
    pub name: String,

    /// Absolute path of the containing directory
    pub dir: PathBuf,

    /// Last modification time
    pub modified: DateTime<Utc>,

    /// Creation time in FILETIME ticks
    pub created: Identifier,

    pub kind: EntryKind,
}

impl RawEntry {
    /// Full path of the entry
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// Name prefix of the temp files a sidecar save writes next to the sidecar
pub const SIDECAR_TEMP_PREFIX: &str = ".dirtag-";

/// Options that shape a directory listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Include dot-files
    pub show_hidden: bool,

    /// Names that never show up in a listing (the sidecar and its backup)
    pub excluded_names: Vec<String>,

    /// Name prefixes that never show up in a listing
    pub excluded_prefixes: Vec<String>,
}

impl ListOptions {
    /// Build listing options that hide the given sidecar file, its backup and
    /// any in-flight temp files written next to it
    #[must_use]
    pub fn for_sidecar(sidecar_name: &str, show_hidden: bool) -> Self {
        Self {
            show_hidden,
            excluded_names: vec![sidecar_name.to_string(), format!("{sidecar_name}.bak")],
            excluded_prefixes: vec![SIDECAR_TEMP_PREFIX.to_string()],
        }
    }

    /// Whether an entry with this name belongs in the listing
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        if self.excluded_names.iter().any(|n| n == name) {
            return false;
        }
        if self.excluded_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return false;
        }
        self.show_hidden || !name.starts_with('.')
    }
}

/// Filesystem operations needed by the loader and the workspace
///
/// Implementations must be shareable across threads so a directory can be
/// listed on a background thread while the owning timeline keeps running.
pub trait FileSystem: Send + Sync {
    /// List the entries of `dir`, in a stable order
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory cannot be read.
    fn list_dir(&self, dir: &Path, options: &ListOptions) -> io::Result<Vec<RawEntry>>;

    /// Rewrite the creation time of `path` to `created` FILETIME ticks
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the platform or the permissions do not allow it.
    fn set_created(&self, path: &Path, created: Identifier) -> io::Result<()>;

    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;
}
