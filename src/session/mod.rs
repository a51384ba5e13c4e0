//! Session - one open directory
//!
//! A [`Session`] owns everything that belongs to the directory being viewed:
//! the [`Catalog`] of its entries, the [`TagStore`] read from its sidecar, and
//! the sidecar location writes go to. Navigating elsewhere drops the session
//! and builds a new one, so no tag data outlives its directory.
//!
//! Filter changes happen here directly; tag changes go through
//! [`Session::mutator`].

pub mod error;
pub mod mutator;

use crate::catalog::{Catalog, CatalogError, Entry, FilterPredicate};
use crate::fs::Identifier;
use crate::loader::{LoadWarning, LoadedDirectory};
use crate::store::{Sidecar, TagStore};
use std::path::{Path, PathBuf};

pub use error::SessionError;
pub use mutator::{MutationOutcome, RemovalOutcome, TagMutator};

/// State of one open directory
#[derive(Debug, Clone)]
pub struct Session {
    dir: PathBuf,
    catalog: Catalog,
    store: TagStore,
    sidecar: Sidecar,
}

impl Session {
    /// Build a session from a finished load, showing entries that pass
    /// `filter`
    ///
    /// The load warnings are handed back for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateIdentifier` if the loaded entries do
    /// not have unique identifiers.
    pub fn open(
        loaded: LoadedDirectory,
        filter: FilterPredicate,
    ) -> Result<(Self, Vec<LoadWarning>), CatalogError> {
        let mut catalog = Catalog::new();
        catalog.set_filter(filter);
        catalog.add_range(loaded.entries)?;

        let session = Self {
            dir: loaded.dir,
            catalog,
            store: loaded.store,
            sidecar: loaded.sidecar,
        };
        Ok((session, loaded.warnings))
    }

    /// The directory this session shows
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn store(&self) -> &TagStore {
        &self.store
    }

    #[must_use]
    pub const fn sidecar(&self) -> &Sidecar {
        &self.sidecar
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterPredicate {
        self.catalog.filter()
    }

    /// Replace the whole filter and recompute the filtered view
    ///
    /// Returns the number of visible entries.
    pub fn set_filter(&mut self, filter: FilterPredicate) -> usize {
        self.catalog.set_filter(filter);
        let visible = self.catalog.apply_filter();
        tracing::debug!(filter = %self.catalog.filter(), visible, "filter applied");
        visible
    }

    /// Change the name part of the filter, keeping the tag part
    pub fn set_name_filter(&mut self, name: impl Into<String>) -> usize {
        let filter = FilterPredicate::new(name, self.filter().tag.clone());
        self.set_filter(filter)
    }

    /// Change the tag part of the filter, keeping the name part
    pub fn set_tag_filter(&mut self, tag: impl Into<String>) -> usize {
        let filter = FilterPredicate::new(self.filter().name.clone(), tag);
        self.set_filter(filter)
    }

    /// Show every entry again
    pub fn reset_filter(&mut self) -> usize {
        self.set_filter(FilterPredicate::all())
    }

    /// Identifiers of the entries with these exact names
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown name and
    /// `CatalogError::Ambiguous` for a name shared by several entries.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Identifier>, CatalogError> {
        names
            .iter()
            .map(|name| self.catalog.by_name(name.as_ref()).map(|e| e.identifier))
            .collect()
    }

    /// Entry with this exact name
    ///
    /// # Errors
    ///
    /// Same as [`Session::resolve`].
    pub fn entry_named(&self, name: &str) -> Result<&Entry, CatalogError> {
        self.catalog.by_name(name)
    }

    /// Tag editing operations on this session
    pub fn mutator(&mut self) -> TagMutator<'_> {
        TagMutator::new(self)
    }
}
