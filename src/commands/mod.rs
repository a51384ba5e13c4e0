//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the open directory of a
//! [`Workspace`](crate::workspace::Workspace). Results and messages go to an
//! [`OutputWriter`](crate::ui::OutputWriter).

pub mod list;
pub mod navigate;
pub mod tag;
pub mod vocab;

use crate::loader::LoadWarning;
use crate::ui::OutputWriter;

// Re-export execute functions for convenience
pub use list::execute as list;
pub use navigate::{open, up};
pub use tag::execute as tag;
pub use tag::untag;
pub use vocab::execute as vocab;

/// Show load warnings to the user
pub fn report_warnings(warnings: &[LoadWarning], output: &dyn OutputWriter) {
    for warning in warnings {
        output.warning(&warning.to_string());
    }
}
