//! Tag and untag commands

use crate::cli::parse_tags;
use crate::ui::OutputWriter;
use crate::workspace::Workspace;
use crate::DirtagError;

type Result<T> = std::result::Result<T, DirtagError>;

fn plural(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}

/// Execute the tag command - add tags to entries
///
/// # Errors
/// Returns an error if no tags are given, an entry name is unknown or
/// ambiguous, or the tag file cannot be written
pub fn execute(
    workspace: &mut Workspace,
    entries: &[String],
    tags: &[String],
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let tags = parse_tags(tags);
    if tags.is_empty() {
        return Err(DirtagError::InvalidInput("No tags provided".into()));
    }

    let session = workspace.require_session()?;
    let selection = session.resolve(entries)?;
    let outcome = session.mutator().apply_tags_to_selection(&selection, &tags)?;

    if !quiet {
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        output.success(&format!(
            "Tagged {} entr{} with: {}",
            selection.len(),
            plural(selection.len()),
            tags.join(", ")
        ));
        if outcome.replaced.is_empty() {
            output.info("Every entry already had these tags.");
        }
    }
    Ok(())
}

/// Execute the untag command - remove tags from entries
///
/// # Errors
/// Returns an error if no tags are given, an entry name is unknown or
/// ambiguous, or the tag file cannot be written
pub fn untag(
    workspace: &mut Workspace,
    entries: &[String],
    tags: &[String],
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let tags = parse_tags(tags);
    if tags.is_empty() {
        return Err(DirtagError::InvalidInput("No tags provided".into()));
    }

    let session = workspace.require_session()?;
    let selection = session.resolve(entries)?;
    let outcome = session.mutator().remove_tags_from_selection(&selection, &tags)?;

    if !quiet {
        let changed = outcome.replaced.len();
        output.success(&format!("Removed tags from {changed} entr{}", plural(changed)));
    }
    Ok(())
}
