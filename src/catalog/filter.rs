//! Name and tag filter for the catalog's filtered view

use super::entry::Entry;
use std::fmt;

/// Combined name-substring and single-tag filter
///
/// Both parts are vacuously true when empty; a non-empty filter requires both
/// to hold. Only one tag can be filtered on at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    /// Case-insensitive substring the entry name must contain
    pub name: String,

    /// Tag the entry must carry
    pub tag: String,
}

impl FilterPredicate {
    #[must_use]
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Filter that lets every entry through
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether this filter lets everything through
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.tag.trim().is_empty()
    }

    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        self.matches_name(&entry.name) && self.matches_tag(entry)
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name.is_empty() || name.to_lowercase().contains(&self.name.to_lowercase())
    }

    fn matches_tag(&self, entry: &Entry) -> bool {
        self.tag.trim().is_empty() || entry.tags.contains(&self.tag)
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.tag.trim().is_empty()) {
            (true, true) => write!(f, "all entries"),
            (false, true) => write!(f, "name contains '{}'", self.name),
            (true, false) => write!(f, "tagged '{}'", self.tag),
            (false, false) => write!(f, "name contains '{}' and tagged '{}'", self.name, self.tag),
        }
    }
}
