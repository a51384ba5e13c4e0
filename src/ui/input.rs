//! User input abstraction layer
//!
//! Confirmation prompts go through [`UserInput`] so the session layer never
//! talks to the terminal directly. The CLI uses [`DialoguerInput`]; `--yes`
//! and tests use [`AutoConfirm`].

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for user input operations
///
/// # Examples
///
/// ```no_run
/// use dirtag::ui::input::{UserInput, DialoguerInput};
///
/// let input = DialoguerInput::new();
/// if let Some(true) = input.prompt_confirm("Remove tags?", false).unwrap() {
///     println!("Removing...");
/// }
/// ```
pub trait UserInput: Send + Sync {
    /// Prompt user for confirmation (yes/no)
    ///
    /// # Arguments
    ///
    /// * `prompt` - The prompt message to display
    /// * `default` - Default selection (true = yes, false = no)
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bool))` - User confirmed (true) or denied (false)
    /// * `Ok(None)` - User cancelled (ESC)
    /// * `Err(_)` - Input operation failed
    fn prompt_confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>>;
}

/// Result type for user input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors that can occur during user input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// IO error during input
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// CLI-based user input using dialoguer
pub struct DialoguerInput {
    theme: dialoguer::theme::ColorfulTheme,
}

impl DialoguerInput {
    /// Create a new dialoguer-based input handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: dialoguer::theme::ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for DialoguerInput {
    fn prompt_confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        use dialoguer::Confirm;

        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .map_err(|e| InputError::Io(io::Error::other(e)))
    }
}

/// Answers every prompt the same way without asking anyone
///
/// Counts the prompts it received, so callers can tell whether a
/// confirmation was requested at all.
#[derive(Debug)]
pub struct AutoConfirm {
    answer: Option<bool>,
    asked: AtomicUsize,
}

impl AutoConfirm {
    /// Always confirm
    #[must_use]
    pub const fn yes() -> Self {
        Self::answering(Some(true))
    }

    /// Always decline
    #[must_use]
    pub const fn no() -> Self {
        Self::answering(Some(false))
    }

    /// Behave like a user pressing ESC
    #[must_use]
    pub const fn cancel() -> Self {
        Self::answering(None)
    }

    const fn answering(answer: Option<bool>) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// Number of prompts answered so far
    #[must_use]
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::Relaxed)
    }
}

impl UserInput for AutoConfirm {
    fn prompt_confirm(&self, prompt: &str, _default: bool) -> Result<Option<bool>> {
        self.asked.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(prompt, answer = ?self.answer, "prompt answered automatically");
        Ok(self.answer)
    }
}
