//! Catalog - full and filtered views over the entries of one directory
//!
//! The catalog keeps two ordered views of the current listing:
//!
//! - **full**: every entry, in directory-listing order
//! - **filtered**: the entries matching the active [`FilterPredicate`], in the
//!   same relative order
//!
//! After every operation the filtered view equals the full view with the
//! predicate applied.
//!
//! # Layout
//!
//! Entries live in an ordered arena of slots with an identifier → slot index
//! beside it. Each slot carries its own "visible" flag, so the filtered view
//! is the visible slots in arena order and can never drift out of order.
//! `replace` and `remove` touch a single slot. Removed slots are left as
//! tombstones and squeezed out once they outnumber the live entries.
//!
//! The catalog is not synchronized; it belongs to a single timeline.

pub mod entry;
pub mod error;
pub mod filter;

use crate::fs::Identifier;
use std::collections::{HashMap, HashSet};

pub use entry::{Entry, TagSet, TagState};
pub use error::CatalogError;
pub use filter::FilterPredicate;

/// Below this many slots tombstones are never compacted
const COMPACT_MIN_SLOTS: usize = 32;

#[derive(Debug, Clone)]
struct Slot {
    entry: Entry,
    visible: bool,
}

/// Ordered entry collection with a filtered view
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    slots: Vec<Option<Slot>>,
    index: HashMap<Identifier, usize>,
    visible: usize,
    filter: FilterPredicate,
}

impl Catalog {
    /// Create an empty catalog that shows every entry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the full view
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of entries in the filtered view
    #[must_use]
    pub const fn filtered_len(&self) -> usize {
        self.visible
    }

    /// The active filter
    #[must_use]
    pub const fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    /// Entries in listing order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.slots.iter().flatten().map(|slot| &slot.entry)
    }

    /// Entries matching the active filter, in listing order
    pub fn filtered(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.visible)
            .map(|slot| &slot.entry)
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateIdentifier` if an entry with the same
    /// identifier is already present.
    pub fn add(&mut self, entry: Entry) -> Result<(), CatalogError> {
        if self.index.contains_key(&entry.identifier) {
            return Err(CatalogError::DuplicateIdentifier(entry.identifier));
        }
        self.push(entry);
        Ok(())
    }

    /// Append several entries, preserving their order
    ///
    /// Either every entry is added or none is.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateIdentifier` if any identifier is already
    /// present or repeats within `entries`.
    pub fn add_range(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<(), CatalogError> {
        let entries: Vec<Entry> = entries.into_iter().collect();

        let mut incoming = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if self.index.contains_key(&entry.identifier) || !incoming.insert(entry.identifier) {
                return Err(CatalogError::DuplicateIdentifier(entry.identifier));
            }
        }

        self.slots.reserve(entries.len());
        for entry in entries {
            self.push(entry);
        }
        Ok(())
    }

    fn push(&mut self, entry: Entry) {
        let visible = self.filter.matches(&entry);
        if visible {
            self.visible += 1;
        }
        self.index.insert(entry.identifier, self.slots.len());
        self.slots.push(Some(Slot { entry, visible }));
    }

    /// Slot position of `entry`, which must be present with exactly this value
    fn locate(&self, entry: &Entry) -> Result<usize, CatalogError> {
        self.index
            .get(&entry.identifier)
            .copied()
            .filter(|&pos| {
                self.slots[pos]
                    .as_ref()
                    .is_some_and(|slot| slot.entry == *entry)
            })
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "'{}' (identifier {})",
                    entry.name, entry.identifier
                ))
            })
    }

    /// Replace `old` with `new` at the same position
    ///
    /// In the filtered view the entry stays in place if `new` still matches
    /// the filter and disappears otherwise.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if `old` is not in the catalog (or is a
    /// stale snapshot), and `CatalogError::DuplicateIdentifier` if `new` takes
    /// an identifier owned by another entry.
    pub fn replace(&mut self, old: &Entry, new: Entry) -> Result<(), CatalogError> {
        let pos = self.locate(old)?;

        if new.identifier != old.identifier {
            if self.index.contains_key(&new.identifier) {
                return Err(CatalogError::DuplicateIdentifier(new.identifier));
            }
            self.index.remove(&old.identifier);
            self.index.insert(new.identifier, pos);
        }

        let visible = self.filter.matches(&new);
        if let Some(slot) = self.slots[pos].as_mut() {
            match (slot.visible, visible) {
                (true, false) => self.visible -= 1,
                (false, true) => self.visible += 1,
                _ => {}
            }
            *slot = Slot {
                entry: new,
                visible,
            };
        }
        Ok(())
    }

    /// Remove an entry from both views
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if `entry` is not in the catalog.
    pub fn remove(&mut self, entry: &Entry) -> Result<Entry, CatalogError> {
        let pos = self.locate(entry)?;
        self.index.remove(&entry.identifier);

        let slot = self.slots[pos]
            .take()
            .ok_or_else(|| CatalogError::NotFound(format!("slot {pos}")))?;
        if slot.visible {
            self.visible -= 1;
        }

        self.maybe_compact();
        Ok(slot.entry)
    }

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.len() - self.index.len();
        if self.slots.len() < COMPACT_MIN_SLOTS || tombstones <= self.index.len() {
            return;
        }

        self.slots.retain(Option::is_some);
        for (pos, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot {
                self.index.insert(slot.entry.identifier, pos);
            }
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.visible = 0;
    }

    /// Install a new filter
    ///
    /// The filtered view is recomputed by [`Catalog::apply_filter`]; entries
    /// added or replaced in between are already judged by the new filter.
    pub fn set_filter(&mut self, filter: FilterPredicate) {
        self.filter = filter;
    }

    /// Recompute the filtered view from the full view
    ///
    /// Returns the number of entries in the filtered view.
    pub fn apply_filter(&mut self) -> usize {
        let mut visible = 0;
        for slot in self.slots.iter_mut().flatten() {
            slot.visible = self.filter.matches(&slot.entry);
            if slot.visible {
                visible += 1;
            }
        }
        self.visible = visible;
        visible
    }

    /// Look up an entry by identifier
    #[must_use]
    pub fn get(&self, identifier: Identifier) -> Option<&Entry> {
        let pos = *self.index.get(&identifier)?;
        self.slots[pos].as_ref().map(|slot| &slot.entry)
    }

    /// Look up an entry by identifier, failing if it is missing
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no entry has this identifier.
    pub fn require(&self, identifier: Identifier) -> Result<&Entry, CatalogError> {
        self.get(identifier)
            .ok_or_else(|| CatalogError::NotFound(format!("identifier {identifier}")))
    }

    /// The only entry matching `predicate`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when nothing matches and
    /// `CatalogError::Ambiguous` when more than one entry does.
    pub fn single<P>(&self, predicate: P) -> Result<&Entry, CatalogError>
    where
        P: Fn(&Entry) -> bool,
    {
        let mut matches = self.iter().filter(|entry| predicate(*entry));
        let found = matches
            .next()
            .ok_or_else(|| CatalogError::NotFound("no entry matches".into()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(CatalogError::Ambiguous {
                what: format!("'{}' and {extra} more", found.name),
                count: extra + 1,
            });
        }
        Ok(found)
    }

    /// The only entry with this exact name
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if there is no such entry and
    /// `CatalogError::Ambiguous` if the name repeats.
    pub fn by_name(&self, name: &str) -> Result<&Entry, CatalogError> {
        self.single(|entry| entry.name == name).map_err(|e| match e {
            CatalogError::NotFound(_) => CatalogError::NotFound(format!("'{name}'")),
            other => other,
        })
    }

    /// First entry in listing order
    #[must_use]
    pub fn first(&self) -> Option<&Entry> {
        self.iter().next()
    }
}
