//! Open and up commands - moving between directories

use crate::commands::list::print_listing;
use crate::commands::report_warnings;
use crate::ui::OutputWriter;
use crate::workspace::{Launcher, NavigationResult, OpenOutcome, Workspace};
use crate::DirtagError;

type Result<T> = std::result::Result<T, DirtagError>;

/// Execute the open command
///
/// Files are handed to `launcher`. Directories become the open directory
/// and are listed.
///
/// # Errors
/// Returns an error if the entry name is unknown, the launcher fails or the
/// subdirectory cannot be listed
pub fn open(
    workspace: &mut Workspace,
    entry: &str,
    launcher: &dyn Launcher,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let identifier = workspace.require_session()?.entry_named(entry)?.identifier;

    match workspace.open(identifier, launcher)? {
        OpenOutcome::Launched(path) => {
            if !quiet {
                output.success(&format!("Opened {}", path.display()));
            }
        }
        OpenOutcome::Navigated(result) => show_navigation(workspace, result, output, quiet)?,
    }
    Ok(())
}

/// Execute the up command - list the parent directory
///
/// # Errors
/// Returns an error if the parent directory cannot be listed
pub fn up(workspace: &mut Workspace, output: &dyn OutputWriter, quiet: bool) -> Result<()> {
    match workspace.go_up()? {
        Some(result) => show_navigation(workspace, result, output, quiet),
        None => {
            if !quiet {
                output.info("Already at the top.");
            }
            Ok(())
        }
    }
}

fn show_navigation(
    workspace: &mut Workspace,
    result: NavigationResult,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    match result {
        NavigationResult::Installed { warnings } => {
            report_warnings(&warnings, output);
            print_listing(workspace.require_session()?, output, quiet);
        }
        NavigationResult::Stale { .. } => {
            if !quiet {
                output.info("Directory changed while loading; listing skipped.");
            }
        }
    }
    Ok(())
}
