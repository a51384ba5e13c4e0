//! Catalog error types
//!
//! Lookup failures signal a broken invariant (identifiers are unique within a
//! listing), so callers treat them as fatal to the operation at hand.

use crate::fs::Identifier;
use thiserror::Error;

/// Catalog-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry matched a lookup
    #[error("No entry found: {0}")]
    NotFound(String),

    /// More than one entry matched a lookup that expects exactly one
    #[error("Ambiguous lookup, {count} entries match: {what}")]
    Ambiguous { what: String, count: usize },

    /// An entry with the same identifier is already in the catalog
    #[error("Duplicate identifier {0}")]
    DuplicateIdentifier(Identifier),
}
