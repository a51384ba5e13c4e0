//! Opening files with the system's default application

use std::io;
use std::path::Path;

/// Hands a file to whatever opens it outside dirtag
pub trait Launcher: Send + Sync {
    /// Open `path`
    ///
    /// # Errors
    ///
    /// Returns the handler's error unchanged; callers do not retry.
    fn launch(&self, path: &Path) -> io::Result<()>;
}

/// Launcher backed by the platform's default handler (`open` crate)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> io::Result<()> {
        tracing::debug!(path = %path.display(), "opening with default application");
        open::that(path)
    }
}
