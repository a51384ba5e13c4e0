//! Entry snapshots and tag state
//!
//! An [`Entry`] is an immutable snapshot of one directory entry together with
//! its tags. Changing tags never mutates an entry; [`Entry::with_tags`] returns
//! a new snapshot that replaces the old one in the catalog.

use crate::fs::{EntryKind, Identifier, RawEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Ordered set of tag strings
pub type TagSet = BTreeSet<String>;

/// Tags recorded for an entry
///
/// `NoneRecorded` means the entry never had tags. `Tags` may be an empty set,
/// which happens after every tag was removed from the entry again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagState {
    #[default]
    NoneRecorded,
    Tags(TagSet),
}

impl TagState {
    /// The recorded tag set, if any
    #[must_use]
    pub const fn tags(&self) -> Option<&TagSet> {
        match self {
            Self::NoneRecorded => None,
            Self::Tags(tags) => Some(tags),
        }
    }

    /// Whether a tag set is recorded and contains `tag`
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags().is_some_and(|tags| tags.contains(tag))
    }

    /// Whether a tag set is recorded and shares at least one tag with `other`
    #[must_use]
    pub fn intersects(&self, other: &TagSet) -> bool {
        self.tags().is_some_and(|tags| !tags.is_disjoint(other))
    }

    /// Tags as a sorted vector, empty when nothing is recorded
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.tags()
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl From<Option<TagSet>> for TagState {
    fn from(value: Option<TagSet>) -> Self {
        value.map_or(Self::NoneRecorded, Self::Tags)
    }
}

impl From<TagState> for Option<TagSet> {
    fn from(value: TagState) -> Self {
        match value {
            TagState::NoneRecorded => None,
            TagState::Tags(tags) => Some(tags),
        }
    }
}

impl Serialize for TagState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tags().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TagState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<TagSet>::deserialize(deserializer).map(Self::from)
    }
}

/// Snapshot of one directory entry with its tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,

    /// Containing directory
    pub dir: PathBuf,

    pub modified: DateTime<Utc>,

    /// Stable key derived from the (possibly adjusted) creation time
    pub identifier: Identifier,

    pub kind: EntryKind,

    pub tags: TagState,
}

impl Entry {
    /// Build an entry from a listing record and an assigned identifier
    #[must_use]
    pub fn from_raw(raw: RawEntry, identifier: Identifier, tags: TagState) -> Self {
        Self {
            name: raw.name,
            dir: raw.dir,
            modified: raw.modified,
            identifier,
            kind: raw.kind,
            tags,
        }
    }

    /// Full path of the entry
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// New snapshot carrying `tags`, everything else unchanged
    #[must_use]
    pub fn with_tags(&self, tags: TagState) -> Self {
        Self {
            tags,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_none_recorded_vs_empty() {
        let none = TagState::NoneRecorded;
        let empty = TagState::Tags(TagSet::new());
        assert_ne!(none, empty);
        assert!(none.tags().is_none());
        assert_eq!(empty.tags(), Some(&TagSet::new()));
        assert!(!none.contains("a"));
        assert!(!empty.contains("a"));
    }

    #[test]
    fn test_intersects() {
        let state = TagState::Tags(set(&["a", "b"]));
        assert!(state.intersects(&set(&["b", "z"])));
        assert!(!state.intersects(&set(&["x", "z"])));
        assert!(!TagState::NoneRecorded.intersects(&set(&["a"])));
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(TagState::from(None), TagState::NoneRecorded);
        let tags = set(&["x"]);
        assert_eq!(TagState::from(Some(tags.clone())), TagState::Tags(tags.clone()));
        assert_eq!(Option::<TagSet>::from(TagState::Tags(tags.clone())), Some(tags));
    }

    #[test]
    fn test_serialize_as_option() {
        let json = serde_json::to_string(&TagState::NoneRecorded).unwrap();
        assert_eq!(json, "null");
        let json = serde_json::to_string(&TagState::Tags(set(&["b", "a"]))).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: TagState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TagState::Tags(set(&["a", "b"])));
    }

    #[test]
    fn test_with_tags_leaves_original_untouched() {
        let entry = Entry {
            name: "a.txt".into(),
            dir: PathBuf::from("/d"),
            modified: DateTime::<Utc>::UNIX_EPOCH,
            identifier: 7,
            kind: EntryKind::File,
            tags: TagState::NoneRecorded,
        };
        let tagged = entry.with_tags(TagState::Tags(set(&["x"])));
        assert_eq!(entry.tags, TagState::NoneRecorded);
        assert!(tagged.tags.contains("x"));
        assert_eq!(tagged.identifier, entry.identifier);
        assert_eq!(tagged.path(), PathBuf::from("/d/a.txt"));
    }
}
