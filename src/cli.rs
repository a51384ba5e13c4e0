//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for dirtag using the `clap` crate.
//!
//! # Commands
//!
//! - **ls**: List the entries of a directory with their tags (default)
//! - **vocab**: Show, add or remove tags known in the directory
//! - **tag** / **untag**: Add tags to entries or take them away
//! - **open**: Open a file, or list a subdirectory
//! - **up**: List the parent directory
//! - **config**: Read and change settings
//!
//! Every command works on one directory: `-C <DIR>`, otherwise the directory
//! used last, otherwise the current directory.
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use dirtag::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["dirtag", "tag", "report.pdf", "-t", "work"]);
//! match cli.get_command() {
//!     Commands::Tag { entries, tags } => {
//!         assert_eq!(entries, vec!["report.pdf".to_string()]);
//!         assert_eq!(tags, vec!["work".to_string()]);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use crate::catalog::TagSet;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., show_hidden=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., sidecar_name)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Vocabulary subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VocabCommands {
    /// List every known tag with how many entries use it
    #[command(visible_alias = "ls")]
    List,

    /// Add a tag to the vocabulary without applying it
    Add {
        #[arg(value_name = "TAG")]
        tag: String,
    },

    /// Remove tags from the vocabulary and from every entry
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_name = "TAG", required = true, num_args = 1..)]
        tags: Vec<String>,

        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "dirtag")]
#[command(about = "Tag the files of a directory", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Directory to work in (defaults to the last one used, then the current one)
    #[arg(short = 'C', long = "dir", value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List entries with their tags (default)
    #[command(visible_alias = "l")]
    Ls {
        /// Only entries whose name contains this text (case-insensitive)
        #[arg(short = 'n', long = "name", value_name = "TEXT")]
        name: Option<String>,

        /// Only entries carrying this tag
        #[arg(short = 't', long = "tag", value_name = "TAG")]
        tag: Option<String>,

        /// Print entries as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Manage the tags known in the directory
    #[command(visible_alias = "v")]
    Vocab {
        #[command(subcommand)]
        command: VocabCommands,
    },

    /// Add tags to entries
    #[command(visible_alias = "t")]
    Tag {
        /// Entry names
        #[arg(value_name = "ENTRY", required = true, num_args = 1..)]
        entries: Vec<String>,

        /// Tags to add (-t a -t b or -t a b)
        #[arg(short = 't', long = "tag", value_name = "TAG", required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Remove tags from entries
    #[command(visible_alias = "u")]
    Untag {
        /// Entry names
        #[arg(value_name = "ENTRY", required = true, num_args = 1..)]
        entries: Vec<String>,

        /// Tags to remove
        #[arg(short = 't', long = "tag", value_name = "TAG", required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Open a file with its default application, or list a subdirectory
    #[command(visible_alias = "o")]
    Open {
        #[arg(value_name = "ENTRY")]
        entry: String,
    },

    /// List the parent directory
    Up,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Ls if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Ls {
            name: None,
            tag: None,
            json: false,
        })
    }
}

impl ConfigCommands {
    /// Split a `key=value` setting
    ///
    /// Returns `None` when there is no `=`.
    #[must_use]
    pub fn split_setting(setting: &str) -> Option<(&str, &str)> {
        setting
            .split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
    }
}

/// Trimmed, non-empty tags from the command line
#[must_use]
pub fn parse_tags(tags: &[String]) -> TagSet {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_ls() {
        let cli = Cli::parse_from(["dirtag"]);
        assert_eq!(
            cli.get_command(),
            Commands::Ls {
                name: None,
                tag: None,
                json: false
            }
        );
    }

    #[test]
    fn test_parse_ls_filters() {
        let cli = Cli::parse_from(["dirtag", "ls", "-n", "report", "-t", "work", "--json"]);
        assert_eq!(
            cli.get_command(),
            Commands::Ls {
                name: Some("report".into()),
                tag: Some("work".into()),
                json: true
            }
        );
    }

    #[test]
    fn test_parse_tag_multiple_entries_and_tags() {
        let cli = Cli::parse_from(["dirtag", "tag", "a.txt", "b.txt", "-t", "x", "y"]);
        if let Commands::Tag { entries, tags } = cli.get_command() {
            assert_eq!(entries, vec!["a.txt", "b.txt"]);
            assert_eq!(tags, vec!["x", "y"]);
        } else {
            panic!("Expected Tag command");
        }
    }

    #[test]
    fn test_tag_requires_tags() {
        assert!(Cli::try_parse_from(["dirtag", "tag", "a.txt"]).is_err());
        assert!(Cli::try_parse_from(["dirtag", "untag", "-t", "x"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["dirtag", "vocab", "list", "-q", "-C", "/tmp/photos"]);
        assert!(cli.quiet);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/photos")));
        assert_eq!(
            cli.get_command(),
            Commands::Vocab {
                command: VocabCommands::List
            }
        );
    }

    #[test]
    fn test_parse_vocab_remove() {
        let cli = Cli::parse_from(["dirtag", "vocab", "rm", "old", "stale", "-y"]);
        assert_eq!(
            cli.get_command(),
            Commands::Vocab {
                command: VocabCommands::Remove {
                    tags: vec!["old".into(), "stale".into()],
                    yes: true
                }
            }
        );
    }

    #[test]
    fn test_split_setting() {
        assert_eq!(
            ConfigCommands::split_setting("quiet = true"),
            Some(("quiet", "true"))
        );
        assert_eq!(
            ConfigCommands::split_setting("last_directory="),
            Some(("last_directory", ""))
        );
        assert_eq!(ConfigCommands::split_setting("quiet"), None);
    }

    #[test]
    fn test_parse_tags_trims_and_dedups() {
        let tags = parse_tags(&[" a ".into(), "b".into(), "".into(), "a".into()]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
