//! Identifier assignment
//!
//! Identifiers come from creation timestamps. Two entries in one directory
//! can share a timestamp (copies, archive extraction), so the assigner nudges
//! later duplicates forward one tick at a time until the value is free.

use crate::fs::Identifier;
use std::collections::HashSet;

/// Outcome of assigning one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assigned {
    pub identifier: Identifier,

    /// Creation time reported by the filesystem
    pub original: Identifier,
}

impl Assigned {
    /// Whether the identifier differs from the reported creation time, in
    /// which case the creation time should be rewritten to match it
    #[must_use]
    pub const fn adjusted(&self) -> bool {
        self.identifier != self.original
    }
}

/// Assigns unique identifiers within one listing pass
#[derive(Debug, Default)]
pub struct IdentifierAssigner {
    taken: HashSet<Identifier>,
}

impl IdentifierAssigner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an identifier for an entry created at `created`
    ///
    /// Entries must be fed in listing order; the first entry holding a
    /// timestamp keeps it.
    pub fn assign(&mut self, created: Identifier) -> Assigned {
        let mut identifier = created;
        while self.taken.contains(&identifier) {
            identifier = identifier.wrapping_add(1);
        }
        self.taken.insert(identifier);
        Assigned {
            identifier,
            original: created,
        }
    }

    /// Number of identifiers handed out so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
