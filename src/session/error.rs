//! Session error types
//!
//! A mutation can fail in three places: looking up the selected entries, asking
//! for confirmation, or writing the sidecar. Each failure leaves the session as
//! it was before the call.

use crate::catalog::CatalogError;
use crate::store::StoreError;
use crate::ui::InputError;
use thiserror::Error;

/// Session and mutation errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Persisting the new tag state failed; nothing was changed
    #[error("Tags not saved: {0}")]
    Store(#[from] StoreError),

    #[error("Confirmation failed: {0}")]
    Input(#[from] InputError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_catalog_error_is_transparent() {
        let error: SessionError = CatalogError::NotFound("'a'".into()).into();
        assert_eq!(error.to_string(), "No entry found: 'a'");
    }

    #[test]
    fn test_store_error_display() {
        let error: SessionError = StoreError::Corrupt {
            path: PathBuf::from("/d/tags.dirtag"),
            reason: "bad".into(),
        }
        .into();
        assert!(error.to_string().starts_with("Tags not saved: "));
    }
}
