//! Output formatting for CLI display
//!
//! Helpers that turn entries, tags and filters into display lines.

use crate::catalog::{Entry, FilterPredicate, TagState};
use colored::Colorize;

/// Display name of an entry, directories marked with a trailing slash
#[must_use]
pub fn entry_name(entry: &Entry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name).blue().bold().to_string()
    } else {
        entry.name.clone()
    }
}

/// Format an entry with its tags for display
#[must_use]
pub fn entry_with_tags(entry: &Entry, quiet: bool) -> String {
    let name = entry_name(entry);

    if quiet {
        return name;
    }
    match &entry.tags {
        TagState::Tags(tags) if !tags.is_empty() => {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            format!("  {} [{}]", name, tags.join(", ").cyan())
        }
        _ => format!("  {name} {}", "(no tags)".dimmed()),
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else {
        format!("  {tag} (used by {count} entr{})", if count == 1 { "y" } else { "ies" })
    }
}

/// Summary line under a listing
#[must_use]
pub fn listing_summary(shown: usize, total: usize, filter: &FilterPredicate) -> String {
    if filter.is_empty() {
        format!("{total} entr{}", if total == 1 { "y" } else { "ies" })
    } else {
        format!("{shown} of {total} entries ({filter})")
    }
}
