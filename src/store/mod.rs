//! Tag store - vocabulary and per-entry tag assignments for one directory
//!
//! The store holds two things:
//!
//! - `vocabulary`: every tag known in the directory, applied or not
//! - `assignments`: identifier → [`TagState`] for entries that were ever tagged
//!
//! Every tag used in an assignment is also in the vocabulary. Operations that
//! could break this (assigning new tags, loading a hand-edited sidecar) extend
//! the vocabulary instead of failing.

pub mod error;
pub mod sidecar;

use crate::catalog::{TagSet, TagState};
use crate::fs::Identifier;
use std::collections::BTreeMap;

pub use error::StoreError;
pub use sidecar::{Sidecar, TagInfo};

/// In-memory tag data of one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStore {
    vocabulary: TagSet,
    assignments: BTreeMap<Identifier, TagState>,
}

impl TagStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from decoded sidecar data
    ///
    /// Tags used by an assignment but missing from the vocabulary are added to
    /// it; the returned list names them so the caller can report the repair.
    #[must_use]
    pub fn from_info(info: TagInfo) -> (Self, Vec<String>) {
        let mut store = Self {
            vocabulary: info.all_tags,
            assignments: info
                .tag_dict
                .into_iter()
                .map(|(id, tags)| (id, TagState::from(tags)))
                .collect(),
        };

        let missing: Vec<String> = store
            .assignments
            .values()
            .filter_map(TagState::tags)
            .flatten()
            .filter(|tag| !store.vocabulary.contains(*tag))
            .cloned()
            .collect::<TagSet>()
            .into_iter()
            .collect();
        store.vocabulary.extend(missing.iter().cloned());

        (store, missing)
    }

    /// Snapshot of the store in sidecar form
    #[must_use]
    pub fn to_info(&self) -> TagInfo {
        TagInfo {
            all_tags: self.vocabulary.clone(),
            tag_dict: self
                .assignments
                .iter()
                .map(|(id, state)| (*id, state.tags().cloned()))
                .collect(),
        }
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &TagSet {
        &self.vocabulary
    }

    #[must_use]
    pub const fn assignments(&self) -> &BTreeMap<Identifier, TagState> {
        &self.assignments
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.vocabulary.contains(tag)
    }

    /// Add a tag to the vocabulary; returns false if it was already known
    pub fn insert_tag(&mut self, tag: impl Into<String>) -> bool {
        self.vocabulary.insert(tag.into())
    }

    /// Drop tags from the vocabulary
    ///
    /// Callers strip the tags from assignments first; see
    /// [`TagMutator::remove_global_tags`](crate::session::TagMutator::remove_global_tags).
    pub fn remove_tags(&mut self, tags: &TagSet) {
        self.vocabulary.retain(|tag| !tags.contains(tag));
    }

    /// Tag state recorded for `identifier`
    #[must_use]
    pub fn tags_for(&self, identifier: Identifier) -> TagState {
        self.assignments
            .get(&identifier)
            .cloned()
            .unwrap_or_default()
    }

    /// Record the tag state of an entry
    ///
    /// Any tag not yet in the vocabulary is added to it.
    pub fn assign(&mut self, identifier: Identifier, state: TagState) {
        if let Some(tags) = state.tags() {
            self.vocabulary.extend(tags.iter().cloned());
        }
        self.assignments.insert(identifier, state);
    }

    /// Number of assignments carrying `tag`
    #[must_use]
    pub fn usage(&self, tag: &str) -> usize {
        self.assignments.values().filter(|s| s.contains(tag)).count()
    }

    /// Whether the vocabulary covers every assigned tag
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.assignments
            .values()
            .filter_map(TagState::tags)
            .all(|tags| tags.is_subset(&self.vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = TagStore::new();
        assert!(store.vocabulary().is_empty());
        assert!(store.assignments().is_empty());
        assert_eq!(store.tags_for(1), TagState::NoneRecorded);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_insert_tag_reports_novelty() {
        let mut store = TagStore::new();
        assert!(store.insert_tag("a"));
        assert!(!store.insert_tag("a"));
        assert!(store.has_tag("a"));
    }

    #[test]
    fn test_assign_extends_vocabulary() {
        let mut store = TagStore::new();
        store.assign(5, TagState::Tags(set(&["x", "y"])));
        assert_eq!(store.vocabulary(), &set(&["x", "y"]));
        assert_eq!(store.tags_for(5), TagState::Tags(set(&["x", "y"])));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_from_info_repairs_vocabulary() {
        let mut tag_dict = BTreeMap::new();
        tag_dict.insert(1, Some(set(&["a", "stray"])));
        tag_dict.insert(2, None);
        let info = TagInfo {
            all_tags: set(&["a", "unused"]),
            tag_dict,
        };

        let (store, missing) = TagStore::from_info(info);
        assert_eq!(missing, vec!["stray".to_string()]);
        assert_eq!(store.vocabulary(), &set(&["a", "stray", "unused"]));
        assert_eq!(store.tags_for(2), TagState::NoneRecorded);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_to_info_and_back() {
        let mut store = TagStore::new();
        store.insert_tag("spare");
        store.assign(10, TagState::Tags(set(&["a"])));
        store.assign(11, TagState::Tags(TagSet::new()));
        store.assign(12, TagState::NoneRecorded);

        let (back, missing) = TagStore::from_info(store.to_info());
        assert!(missing.is_empty());
        assert_eq!(back, store);
    }

    #[test]
    fn test_usage_and_remove_tags() {
        let mut store = TagStore::new();
        store.assign(1, TagState::Tags(set(&["a", "b"])));
        store.assign(2, TagState::Tags(set(&["a"])));
        assert_eq!(store.usage("a"), 2);
        assert_eq!(store.usage("b"), 1);

        store.remove_tags(&set(&["b", "nope"]));
        assert_eq!(store.vocabulary(), &set(&["a"]));
    }
}
