//! Directory loader
//!
//! Turns one directory into the data a [`Session`](crate::session::Session)
//! needs:
//!
//! 1. read the sidecar into a [`TagStore`] (empty when absent or corrupt)
//! 2. list the directory through the [`FileSystem`] collaborator
//! 3. assign identifiers, rewriting creation times of adjusted entries
//! 4. attach each entry's recorded tags
//!
//! Only a failure to list the directory aborts a load. Everything else is
//! collected as a [`LoadWarning`] and travels with the result.

pub mod identifier;

use crate::catalog::Entry;
use crate::fs::{FileSystem, Identifier, ListOptions};
use crate::store::sidecar::DEFAULT_SIDECAR_NAME;
use crate::store::{Sidecar, StoreError, TagStore};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use identifier::{Assigned, IdentifierAssigner};

/// Errors that abort a directory load
#[derive(Debug, Error)]
pub enum LoadError {
    /// The directory could not be listed
    #[error("Cannot list '{path}': {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A creation time that could not be rewritten after disambiguation
///
/// The entry keeps its adjusted identifier for this session, but the next
/// listing may assign it a different one.
#[derive(Debug, Error)]
#[error("Cannot pin identifier {identifier} on '{name}': {source}")]
pub struct RewriteFailure {
    pub name: String,
    pub identifier: Identifier,
    #[source]
    pub source: io::Error,
}

/// Recoverable problems met while loading
#[derive(Debug, Error)]
pub enum LoadWarning {
    /// The sidecar could not be read; tags start out empty
    #[error("Tag file ignored, starting with no tags: {0}")]
    TagsUnreadable(#[source] StoreError),

    /// The sidecar used tags missing from its vocabulary
    #[error("Tag vocabulary repaired, added: {}", .0.join(", "))]
    VocabularyRepaired(Vec<String>),

    #[error(transparent)]
    Rewrite(#[from] RewriteFailure),
}

/// Settings that shape a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub sidecar_name: String,
    pub show_hidden: bool,
    pub backup_sidecar: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            sidecar_name: DEFAULT_SIDECAR_NAME.to_string(),
            show_hidden: false,
            backup_sidecar: false,
        }
    }
}

/// Everything read from one directory
#[derive(Debug)]
pub struct LoadedDirectory {
    pub dir: PathBuf,

    /// Entries in listing order, with tags attached
    pub entries: Vec<Entry>,

    pub store: TagStore,

    pub sidecar: Sidecar,

    pub warnings: Vec<LoadWarning>,
}

/// Loads directories through a [`FileSystem`]
pub struct DirectoryLoader<'a> {
    fs: &'a dyn FileSystem,
    options: LoaderOptions,
}

impl<'a> DirectoryLoader<'a> {
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, options: LoaderOptions) -> Self {
        Self { fs, options }
    }

    /// Load `dir`
    ///
    /// # Errors
    ///
    /// Returns `LoadError::List` if the directory cannot be listed. Sidecar
    /// and creation-time problems are reported in
    /// [`LoadedDirectory::warnings`] instead.
    pub fn load(&self, dir: &Path) -> Result<LoadedDirectory, LoadError> {
        let mut warnings = Vec::new();

        let sidecar =
            Sidecar::new(dir, &self.options.sidecar_name).with_backup(self.options.backup_sidecar);
        let store = Self::load_store(&sidecar, &mut warnings);

        let list_options = ListOptions::for_sidecar(&self.options.sidecar_name, self.options.show_hidden);
        let raw_entries = self
            .fs
            .list_dir(dir, &list_options)
            .map_err(|source| LoadError::List {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut assigner = IdentifierAssigner::new();
        let mut entries = Vec::with_capacity(raw_entries.len());
        for raw in raw_entries {
            let assigned = assigner.assign(raw.created);
            if assigned.adjusted() {
                if let Err(failure) = self.pin_identifier(&raw.path(), &raw.name, assigned) {
                    tracing::debug!(%failure, "identifier not stable across listings");
                    warnings.push(failure.into());
                }
            }
            let tags = store.tags_for(assigned.identifier);
            entries.push(Entry::from_raw(raw, assigned.identifier, tags));
        }

        tracing::debug!(
            dir = %dir.display(),
            entries = entries.len(),
            warnings = warnings.len(),
            "directory loaded"
        );

        Ok(LoadedDirectory {
            dir: dir.to_path_buf(),
            entries,
            store,
            sidecar,
            warnings,
        })
    }

    fn load_store(sidecar: &Sidecar, warnings: &mut Vec<LoadWarning>) -> TagStore {
        match sidecar.load() {
            Ok(Some(info)) => {
                let (store, missing) = TagStore::from_info(info);
                if !missing.is_empty() {
                    tracing::debug!(path = %sidecar.path().display(), ?missing, "vocabulary repaired");
                    warnings.push(LoadWarning::VocabularyRepaired(missing));
                }
                store
            }
            Ok(None) => TagStore::new(),
            Err(e) => {
                tracing::debug!(error = %e, "falling back to empty tag store");
                warnings.push(LoadWarning::TagsUnreadable(e));
                TagStore::new()
            }
        }
    }

    /// Rewrite the creation time so later listings see the adjusted value
    fn pin_identifier(&self, path: &Path, name: &str, assigned: Assigned) -> Result<(), RewriteFailure> {
        self.fs
            .set_created(path, assigned.identifier)
            .map_err(|source| RewriteFailure {
                name: name.to_string(),
                identifier: assigned.identifier,
                source,
            })?;
        tracing::debug!(
            entry = name,
            from = assigned.original,
            to = assigned.identifier,
            "creation time rewritten"
        );
        Ok(())
    }
}
