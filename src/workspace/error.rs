//! Workspace error types

use crate::catalog::CatalogError;
use crate::loader::LoadError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Navigation and open errors
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The default handler could not open a file
    #[error("Cannot open '{path}': {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A background load ended without reporting back
    #[error("Directory load was interrupted")]
    LoadInterrupted,

    /// The operation needs an open directory
    #[error("No directory is open")]
    NoDirectory,
}
