//! Dirtag - per-directory file tagging
//!
//! This library lists one directory at a time, gives every entry a stable
//! identifier derived from its creation time, and keeps the tags of the
//! directory in a small sidecar file next to the entries.
//!
//! The pieces, bottom up:
//!
//! - [`fs`]: the filesystem collaborator (native and in-memory)
//! - [`loader`]: reading a directory into entries plus its tag store
//! - [`catalog`]: the ordered entry list with its filtered view
//! - [`store`]: the tag vocabulary, assignments and sidecar encoding
//! - [`session`]: one open directory and the operations that change tags
//! - [`workspace`]: moving between directories, discarding stale loads

use thiserror::Error;

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod loader;
pub mod output;
pub mod session;
pub mod store;
pub mod ui;
pub mod workspace;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum DirtagError {
    /// Entry lookup error
    #[error("{0}")]
    Catalog(#[from] catalog::CatalogError),
    /// Tag file error
    #[error("Tag file error: {0}")]
    Store(#[from] store::StoreError),
    /// Directory could not be loaded
    #[error("{0}")]
    Load(#[from] loader::LoadError),
    /// Tag editing error
    #[error(transparent)]
    Session(#[from] session::SessionError),
    /// Navigation or launch error
    #[error(transparent)]
    Workspace(#[from] workspace::WorkspaceError),
    /// Prompt error
    #[error("Input error: {0}")]
    Input(#[from] ui::InputError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
