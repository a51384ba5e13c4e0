//! Tag store error types
//!
//! # Error Types
//!
//! - **`Io`**: the sidecar file could not be read or written
//! - **`Corrupt`**: the sidecar exists but is not a valid tag record
//! - **`Encode`**: the in-memory store could not be serialized

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Tag store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the sidecar file failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Sidecar file exists but cannot be decoded
    #[error("Corrupt tag file '{path}': {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Represents a bincode encoding error
    #[error("Error while encoding tag data: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
