//! UI abstraction layer
//!
//! Backend-agnostic interfaces for the two ways dirtag talks to a person:
//!
//! - **`UserInput`** - confirmation prompts
//! - **`OutputWriter`** - status messages with severity levels
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Business Logic Layer               │
//! │   (session, commands)                   │
//! └────────────────┬────────────────────────┘
//!                  │ Uses traits
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │      UserInput / OutputWriter           │
//! └────────────────┬────────────────────────┘
//!         ┌────────┴────────┐
//!         ▼                 ▼
//! ┌───────────────┐  ┌───────────────────┐
//! │ Terminal      │  │ Scripted          │
//! │ - Dialoguer   │  │ - AutoConfirm     │
//! │ - Stdout      │  │ - BufferWriter    │
//! └───────────────┘  └───────────────────┘
//! ```

pub mod input;
pub mod output;

pub use input::{AutoConfirm, DialoguerInput, InputError, UserInput};
pub use output::{OutputWriter, StdoutWriter};
#[cfg(test)]
pub use output::{BufferWriter, MessageLevel};
