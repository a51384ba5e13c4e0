//! Vocab command - directory-wide tag management

use crate::cli::{VocabCommands, parse_tags};
use crate::session::RemovalOutcome;
use crate::ui::{AutoConfirm, OutputWriter, UserInput};
use crate::workspace::Workspace;
use crate::{DirtagError, output};

type Result<T> = std::result::Result<T, DirtagError>;

/// Execute the vocab management command
///
/// Removal asks `input` for confirmation unless `confirm_removal` is off or
/// `--yes` was given.
///
/// # Errors
/// Returns an error if no directory is open, the tag file cannot be written
/// or the confirmation prompt fails
pub fn execute(
    workspace: &mut Workspace,
    command: &VocabCommands,
    confirm_removal: bool,
    input: &dyn UserInput,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    match command {
        VocabCommands::List => list_vocabulary(workspace, output, quiet),
        VocabCommands::Add { tag } => add_tag(workspace, tag, output, quiet),
        VocabCommands::Remove { tags, yes } => {
            let auto = AutoConfirm::yes();
            let confirmer: &dyn UserInput = if *yes || !confirm_removal { &auto } else { input };
            remove_tags(workspace, tags, confirmer, output, quiet)
        }
    }
}

fn list_vocabulary(workspace: &mut Workspace, output: &dyn OutputWriter, quiet: bool) -> Result<()> {
    let store = workspace.require_session()?.store();

    if store.vocabulary().is_empty() {
        if !quiet {
            output.info("No tags in this directory.");
        }
        return Ok(());
    }

    if !quiet {
        output.info("Tags in this directory:");
    }
    for tag in store.vocabulary() {
        output.write(&output::tag_with_count(tag, store.usage(tag), quiet));
    }
    Ok(())
}

fn add_tag(workspace: &mut Workspace, tag: &str, output: &dyn OutputWriter, quiet: bool) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(DirtagError::InvalidInput("Tag cannot be empty".into()));
    }

    let session = workspace.require_session()?;
    let known = session.store().has_tag(tag);
    let outcome = session.mutator().add_global_tag(tag)?;

    if quiet {
        return Ok(());
    }
    if outcome.saved {
        output.success(&format!("Added tag '{tag}'"));
    } else if known {
        output.info(&format!("Tag '{tag}' already exists."));
    } else {
        output.warning("Directory has no entries; tag not added.");
    }
    Ok(())
}

fn remove_tags(
    workspace: &mut Workspace,
    tags: &[String],
    confirmer: &dyn UserInput,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let tags = parse_tags(tags);
    if tags.is_empty() {
        return Err(DirtagError::InvalidInput("No tags provided".into()));
    }

    let session = workspace.require_session()?;
    for unknown in tags.iter().filter(|t| !session.store().has_tag(t)) {
        output.warning(&format!("Tag '{unknown}' is not in use here"));
    }

    match session.mutator().remove_global_tags(&tags, confirmer)? {
        RemovalOutcome::Cancelled => {
            if !quiet {
                output.info("Cancelled.");
            }
        }
        RemovalOutcome::Done(outcome) => {
            if !quiet {
                let changed = outcome.replaced.len();
                output.success(&format!(
                    "Removed {} tag(s), {changed} entr{} updated",
                    tags.len(),
                    if changed == 1 { "y" } else { "ies" }
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TagSet;
    use crate::testing::TestDir;
    use crate::ui::{BufferWriter, MessageLevel};

    fn apply(workspace: &mut Workspace, ids: &[i64], tags: &[&str]) {
        let tags: TagSet = tags.iter().map(|t| (*t).to_string()).collect();
        workspace
            .require_session()
            .unwrap()
            .mutator()
            .apply_tags_to_selection(ids, &tags)
            .unwrap();
    }

    fn run(workspace: &mut Workspace, command: VocabCommands, input: &dyn UserInput) -> BufferWriter {
        let out = BufferWriter::new();
        execute(workspace, &command, true, input, &out, false).unwrap();
        out
    }

    #[test]
    fn test_list_with_counts() {
        let dir = TestDir::with_files(&[("a", 1), ("b", 2)]);
        let mut workspace = dir.workspace();
        apply(&mut workspace, &[1, 2], &["work"]);
        apply(&mut workspace, &[1], &["draft"]);

        let out = run(&mut workspace, VocabCommands::List, &AutoConfirm::no());
        assert_eq!(
            out.lines(MessageLevel::Normal),
            vec!["  draft (used by 1 entry)", "  work (used by 2 entries)"]
        );
    }

    #[test]
    fn test_add_tag() {
        let dir = TestDir::with_files(&[("a", 1)]);
        let mut workspace = dir.workspace();

        let out = run(&mut workspace, VocabCommands::Add { tag: " new ".into() }, &AutoConfirm::no());
        assert_eq!(out.lines(MessageLevel::Success), vec!["Added tag 'new'"]);

        let out = run(&mut workspace, VocabCommands::Add { tag: "new".into() }, &AutoConfirm::no());
        assert_eq!(out.lines(MessageLevel::Info), vec!["Tag 'new' already exists."]);
    }

    #[test]
    fn test_add_tag_in_empty_directory() {
        let dir = TestDir::new();
        let mut workspace = dir.workspace();

        let out = run(&mut workspace, VocabCommands::Add { tag: "x".into() }, &AutoConfirm::no());
        assert_eq!(out.lines(MessageLevel::Warning).len(), 1);
        assert!(workspace.session().unwrap().store().vocabulary().is_empty());
    }

    #[test]
    fn test_remove_asks_for_confirmation() {
        let dir = TestDir::with_files(&[("a", 1)]);
        let mut workspace = dir.workspace();
        apply(&mut workspace, &[1], &["t"]);

        let declined = AutoConfirm::no();
        let remove = VocabCommands::Remove {
            tags: vec!["t".into()],
            yes: false,
        };
        let out = run(&mut workspace, remove.clone(), &declined);
        assert_eq!(declined.asked(), 1);
        assert_eq!(out.lines(MessageLevel::Info), vec!["Cancelled."]);
        assert!(workspace.session().unwrap().store().has_tag("t"));

        let accepted = AutoConfirm::yes();
        run(&mut workspace, remove, &accepted);
        assert!(!workspace.session().unwrap().store().has_tag("t"));
        assert!(!workspace.session().unwrap().entry_named("a").unwrap().tags.contains("t"));
    }

    #[test]
    fn test_remove_with_yes_skips_prompt() {
        let dir = TestDir::with_files(&[("a", 1)]);
        let mut workspace = dir.workspace();
        apply(&mut workspace, &[1], &["t"]);

        let input = AutoConfirm::no();
        let out = run(
            &mut workspace,
            VocabCommands::Remove {
                tags: vec!["t".into(), "ghost".into()],
                yes: true,
            },
            &input,
        );
        assert_eq!(input.asked(), 0);
        assert_eq!(out.lines(MessageLevel::Warning), vec!["Tag 'ghost' is not in use here"]);
        assert!(!workspace.session().unwrap().store().has_tag("t"));
    }
}
