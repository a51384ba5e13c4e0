//! List command - show the entries of the open directory

use crate::catalog::FilterPredicate;
use crate::session::Session;
use crate::ui::OutputWriter;
use crate::workspace::Workspace;
use crate::{DirtagError, output};

type Result<T> = std::result::Result<T, DirtagError>;

/// Execute the list command
///
/// A name or tag argument replaces the current filter before listing.
///
/// # Errors
/// Returns an error if no directory is open or JSON encoding fails
pub fn execute(
    workspace: &mut Workspace,
    name: Option<&str>,
    tag: Option<&str>,
    json: bool,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    if name.is_some() || tag.is_some() {
        workspace.set_filter(FilterPredicate::new(
            name.unwrap_or_default(),
            tag.unwrap_or_default(),
        ));
    }
    let session = workspace.require_session()?;

    if json {
        let entries: Vec<_> = session.catalog().filtered().collect();
        output.write(&serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print_listing(session, output, quiet);
    Ok(())
}

/// Print the filtered view of `session`
pub fn print_listing(session: &Session, output: &dyn OutputWriter, quiet: bool) {
    let catalog = session.catalog();

    if !quiet {
        output.info(&session.dir().display().to_string());
    }
    if catalog.filtered_len() == 0 {
        if !quiet {
            output.info(if catalog.is_empty() {
                "No entries in this directory."
            } else {
                "No entries match the filter."
            });
        }
        return;
    }

    for entry in catalog.filtered() {
        output.write(&output::entry_with_tags(entry, quiet));
    }
    if !quiet {
        output.info(&output::listing_summary(
            catalog.filtered_len(),
            catalog.len(),
            catalog.filter(),
        ));
    }
}
