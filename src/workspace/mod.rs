//! Workspace - navigation between directories
//!
//! The workspace owns the current [`Session`] and decides which load result
//! may replace it. Every navigation is stamped with a fresh [`Generation`];
//! a load that finishes after a newer navigation started is dropped instead
//! of overwriting the newer directory.
//!
//! ```text
//! begin_navigation(dir) ──► ticket (gen N)
//!        │
//!        ├── load(ticket)                 same thread
//!        └── load_in_background(ticket)   worker thread ──► PendingLoad
//!                                                           │
//! complete_navigation(CompletedLoad) ◄──────────────────────┘
//!        │
//!        ├── gen N still current ──► Installed (session replaced)
//!        └── gen N superseded    ──► Stale (result dropped)
//! ```
//!
//! Observers get [`WorkspaceEvent`]s over channels from [`Workspace::subscribe`].

pub mod error;
pub mod launcher;

use crate::catalog::FilterPredicate;
use crate::fs::{FileSystem, Identifier};
use crate::loader::{DirectoryLoader, LoadError, LoadWarning, LoadedDirectory, LoaderOptions};
use crate::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

pub use error::WorkspaceError;
pub use launcher::{Launcher, SystemLauncher};

/// Navigation counter; only the newest one may install a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Permission to load one directory, issued by [`Workspace::begin_navigation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    pub generation: Generation,
    pub dir: PathBuf,
}

/// A finished load waiting to be installed
#[derive(Debug)]
pub struct CompletedLoad {
    pub generation: Generation,
    pub result: Result<LoadedDirectory, LoadError>,
}

/// A load running on a worker thread
#[derive(Debug)]
pub struct PendingLoad {
    generation: Generation,
    receiver: Receiver<CompletedLoad>,
}

impl PendingLoad {
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Block until the load finishes
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::LoadInterrupted` if the worker died without
    /// sending a result.
    pub fn wait(self) -> Result<CompletedLoad, WorkspaceError> {
        self.receiver
            .recv()
            .map_err(|_| WorkspaceError::LoadInterrupted)
    }

    /// Non-blocking check for the result
    #[must_use]
    pub fn poll(&self) -> Option<CompletedLoad> {
        self.receiver.try_recv().ok()
    }
}

/// How a navigation ended
#[derive(Debug)]
pub enum NavigationResult {
    /// The directory is now the current session
    Installed { warnings: Vec<LoadWarning> },

    /// A newer navigation started first; the result was dropped
    Stale { generation: Generation },
}

/// What [`Workspace::open`] did with an entry
#[derive(Debug)]
pub enum OpenOutcome {
    /// A directory entry was navigated into
    Navigated(NavigationResult),

    /// A file was handed to the launcher
    Launched(PathBuf),
}

/// Notifications for observers of the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    Navigated {
        dir: PathBuf,
        entries: usize,
        warnings: usize,
    },
    StaleLoadDiscarded {
        generation: Generation,
    },
    Launched {
        path: PathBuf,
    },
    Closed,
}

/// Current directory plus the machinery to move between directories
pub struct Workspace {
    fs: Arc<dyn FileSystem>,
    options: LoaderOptions,
    generation: Generation,
    session: Option<Session>,

    /// Filter carried from one directory to the next
    filter: FilterPredicate,

    subscribers: Vec<Sender<WorkspaceEvent>>,
}

impl Workspace {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, options: LoaderOptions) -> Self {
        Self {
            fs,
            options,
            generation: Generation::default(),
            session: None,
            filter: FilterPredicate::all(),
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// The open session, or `WorkspaceError::NoDirectory`
    ///
    /// # Errors
    ///
    /// Fails when no directory has been navigated to yet.
    pub fn require_session(&mut self) -> Result<&mut Session, WorkspaceError> {
        self.session.as_mut().ok_or(WorkspaceError::NoDirectory)
    }

    /// Generation of the newest navigation
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Filter used for the next directory, and for the current one
    pub fn set_filter(&mut self, filter: FilterPredicate) {
        if let Some(session) = self.session.as_mut() {
            session.set_filter(filter.clone());
        }
        self.filter = filter;
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&mut self) -> Receiver<WorkspaceEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: WorkspaceEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Start navigating to `dir`
    ///
    /// Returns `None` and changes nothing when `dir` does not exist or is not
    /// a directory. Otherwise every earlier navigation becomes stale.
    pub fn begin_navigation(&mut self, dir: &Path) -> Option<NavigationTicket> {
        if !self.fs.is_dir(dir) {
            tracing::debug!(dir = %dir.display(), "navigation target ignored");
            return None;
        }
        self.generation = self.generation.next();
        Some(NavigationTicket {
            generation: self.generation,
            dir: dir.to_path_buf(),
        })
    }

    /// Load the ticket's directory on the calling thread
    #[must_use]
    pub fn load(&self, ticket: &NavigationTicket) -> CompletedLoad {
        CompletedLoad {
            generation: ticket.generation,
            result: DirectoryLoader::new(self.fs.as_ref(), self.options.clone()).load(&ticket.dir),
        }
    }

    /// Load the ticket's directory on a worker thread
    #[must_use]
    pub fn load_in_background(&self, ticket: NavigationTicket) -> PendingLoad {
        let (tx, rx) = mpsc::channel();
        let fs = Arc::clone(&self.fs);
        let options = self.options.clone();
        let generation = ticket.generation;

        thread::spawn(move || {
            let result = DirectoryLoader::new(fs.as_ref(), options).load(&ticket.dir);
            // the receiver may be gone if the caller stopped waiting
            let _ = tx.send(CompletedLoad { generation, result });
        });

        PendingLoad {
            generation,
            receiver: rx,
        }
    }

    /// Install a finished load if its navigation is still the newest
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Load` if the current navigation's load failed;
    /// the previous session stays open. Failures of stale loads are dropped
    /// with them.
    pub fn complete_navigation(
        &mut self,
        completed: CompletedLoad,
    ) -> Result<NavigationResult, WorkspaceError> {
        if completed.generation != self.generation {
            tracing::debug!(
                stale = completed.generation.0,
                current = self.generation.0,
                "discarding stale directory load"
            );
            self.emit(WorkspaceEvent::StaleLoadDiscarded {
                generation: completed.generation,
            });
            return Ok(NavigationResult::Stale {
                generation: completed.generation,
            });
        }

        let (session, warnings) = Session::open(completed.result?, self.filter.clone())?;
        let event = WorkspaceEvent::Navigated {
            dir: session.dir().to_path_buf(),
            entries: session.catalog().len(),
            warnings: warnings.len(),
        };
        tracing::info!(dir = %session.dir().display(), entries = session.catalog().len(), "directory opened");
        self.session = Some(session);
        self.emit(event);
        Ok(NavigationResult::Installed { warnings })
    }

    /// Navigate to `dir` synchronously
    ///
    /// Returns `Ok(None)` when `dir` is not a directory.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Load` if the directory cannot be listed.
    pub fn go_to(&mut self, dir: &Path) -> Result<Option<NavigationResult>, WorkspaceError> {
        let Some(ticket) = self.begin_navigation(dir) else {
            return Ok(None);
        };
        let completed = self.load(&ticket);
        self.complete_navigation(completed).map(Some)
    }

    /// Navigate to the parent of the current directory
    ///
    /// Returns `Ok(None)` at the filesystem root or with no directory open.
    ///
    /// # Errors
    ///
    /// Same as [`Workspace::go_to`].
    pub fn go_up(&mut self) -> Result<Option<NavigationResult>, WorkspaceError> {
        let Some(parent) = self
            .session
            .as_ref()
            .and_then(|s| s.dir().parent())
            .map(Path::to_path_buf)
        else {
            return Ok(None);
        };
        self.go_to(&parent)
    }

    /// Open an entry of the current directory
    ///
    /// Directories are navigated into; files go to `launcher`.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::NoDirectory` with no directory open,
    /// `WorkspaceError::Catalog` for an unknown identifier,
    /// `WorkspaceError::Launch` if the launcher fails, and load errors when
    /// entering a directory.
    pub fn open(
        &mut self,
        identifier: Identifier,
        launcher: &dyn Launcher,
    ) -> Result<OpenOutcome, WorkspaceError> {
        let session = self.session.as_ref().ok_or(WorkspaceError::NoDirectory)?;
        let entry = session.catalog().require(identifier)?;
        let path = entry.path();

        if entry.is_dir() {
            return match self.go_to(&path)? {
                Some(result) => Ok(OpenOutcome::Navigated(result)),
                // vanished between listing and opening
                None => Err(LoadError::List {
                    path,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }
                .into()),
            };
        }

        launcher
            .launch(&path)
            .map_err(|source| WorkspaceError::Launch {
                path: path.clone(),
                source,
            })?;
        self.emit(WorkspaceEvent::Launched { path: path.clone() });
        Ok(OpenOutcome::Launched(path))
    }

    /// Drop the current directory
    ///
    /// Loads still in flight become stale.
    pub fn close(&mut self) {
        self.generation = self.generation.next();
        if self.session.take().is_some() {
            self.emit(WorkspaceEvent::Closed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use std::io;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Launcher that records paths instead of opening them
    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, path: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("no handler"));
            }
            self.launched.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    /// Temp dir with files a (1), b (2) and subdirectory sub (3) holding c (4)
    fn setup() -> (TempDir, Arc<MemoryFileSystem>, Workspace) {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_dir(dir.path(), 0);
        fs.add_file(dir.path().join("a"), 1);
        fs.add_file(dir.path().join("b"), 2);
        fs.add_dir(dir.path().join("sub"), 3);
        fs.add_file(dir.path().join("sub").join("c"), 4);
        let workspace = Workspace::new(fs.clone(), LoaderOptions::default());
        (dir, fs, workspace)
    }

    fn names(workspace: &Workspace) -> Vec<String> {
        workspace
            .session()
            .unwrap()
            .catalog()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn test_go_to_installs_session() {
        let (dir, _fs, mut workspace) = setup();
        let result = workspace.go_to(dir.path()).unwrap();
        assert!(matches!(result, Some(NavigationResult::Installed { .. })));
        assert_eq!(names(&workspace), vec!["a", "b", "sub"]);
        assert_eq!(workspace.session().unwrap().dir(), dir.path());
    }

    #[test]
    fn test_invalid_target_is_ignored() {
        let (dir, _fs, mut workspace) = setup();
        workspace.go_to(dir.path()).unwrap();
        let generation = workspace.generation();

        assert!(workspace.begin_navigation(&dir.path().join("missing")).is_none());
        assert!(workspace.go_to(&dir.path().join("a")).unwrap().is_none());
        assert_eq!(workspace.generation(), generation);
        assert_eq!(names(&workspace), vec!["a", "b", "sub"]);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let (dir, _fs, mut workspace) = setup();
        let events = workspace.subscribe();

        let first = workspace.begin_navigation(dir.path()).unwrap();
        let second = workspace.begin_navigation(&dir.path().join("sub")).unwrap();
        assert!(second.generation > first.generation);

        let newer = workspace.load(&second);
        let older = workspace.load(&first);

        assert!(matches!(
            workspace.complete_navigation(newer).unwrap(),
            NavigationResult::Installed { .. }
        ));
        assert!(matches!(
            workspace.complete_navigation(older).unwrap(),
            NavigationResult::Stale { generation } if generation == first.generation
        ));
        assert_eq!(names(&workspace), vec!["c"]);

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(matches!(received[0], WorkspaceEvent::Navigated { entries: 1, .. }));
        assert_eq!(
            received[1],
            WorkspaceEvent::StaleLoadDiscarded {
                generation: first.generation
            }
        );
    }

    #[test]
    fn test_background_load() {
        let (dir, _fs, mut workspace) = setup();
        let ticket = workspace.begin_navigation(dir.path()).unwrap();
        let pending = workspace.load_in_background(ticket);
        assert_eq!(pending.generation(), workspace.generation());

        let completed = pending.wait().unwrap();
        workspace.complete_navigation(completed).unwrap();
        assert_eq!(names(&workspace), vec!["a", "b", "sub"]);
    }

    #[test]
    fn test_background_load_superseded_by_close() {
        let (dir, _fs, mut workspace) = setup();
        let ticket = workspace.begin_navigation(dir.path()).unwrap();
        let pending = workspace.load_in_background(ticket);
        workspace.close();

        let completed = pending.wait().unwrap();
        assert!(matches!(
            workspace.complete_navigation(completed).unwrap(),
            NavigationResult::Stale { .. }
        ));
        assert!(workspace.session().is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_session() {
        let (dir, fs, mut workspace) = setup();
        workspace.go_to(dir.path()).unwrap();

        let ticket = workspace.begin_navigation(&dir.path().join("sub")).unwrap();
        fs.remove(dir.path().join("sub"));
        let completed = workspace.load(&ticket);
        let err = workspace.complete_navigation(completed).unwrap_err();

        assert!(matches!(err, WorkspaceError::Load(LoadError::List { .. })));
        assert_eq!(names(&workspace), vec!["a", "b", "sub"]);
    }

    #[test]
    fn test_open_file_uses_launcher() {
        let (dir, _fs, mut workspace) = setup();
        workspace.go_to(dir.path()).unwrap();
        let launcher = RecordingLauncher::default();

        let outcome = workspace.open(1, &launcher).unwrap();
        assert!(matches!(outcome, OpenOutcome::Launched(ref p) if *p == dir.path().join("a")));
        assert_eq!(*launcher.launched.lock().unwrap(), vec![dir.path().join("a")]);
    }

    #[test]
    fn test_open_directory_navigates() {
        let (dir, _fs, mut workspace) = setup();
        workspace.go_to(dir.path()).unwrap();
        let launcher = RecordingLauncher::default();

        let outcome = workspace.open(3, &launcher).unwrap();
        assert!(matches!(outcome, OpenOutcome::Navigated(NavigationResult::Installed { .. })));
        assert_eq!(names(&workspace), vec!["c"]);
        assert!(launcher.launched.lock().unwrap().is_empty());

        workspace.go_up().unwrap();
        assert_eq!(workspace.session().unwrap().dir(), dir.path());
    }

    #[test]
    fn test_open_errors() {
        let (dir, _fs, mut workspace) = setup();
        let launcher = RecordingLauncher {
            fail: true,
            ..RecordingLauncher::default()
        };
        assert!(matches!(
            workspace.open(1, &launcher),
            Err(WorkspaceError::NoDirectory)
        ));

        workspace.go_to(dir.path()).unwrap();
        assert!(matches!(
            workspace.open(99, &launcher),
            Err(WorkspaceError::Catalog(_))
        ));
        assert!(matches!(
            workspace.open(1, &launcher),
            Err(WorkspaceError::Launch { .. })
        ));
    }

    #[test]
    fn test_filter_carries_across_navigation() {
        let (dir, _fs, mut workspace) = setup();
        workspace.set_filter(FilterPredicate::new("a", ""));
        workspace.go_to(dir.path()).unwrap();

        let visible: Vec<_> = workspace
            .session()
            .unwrap()
            .catalog()
            .filtered()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(visible, vec!["a"]);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (dir, _fs, mut workspace) = setup();
        let kept = workspace.subscribe();
        drop(workspace.subscribe());

        workspace.go_to(dir.path()).unwrap();
        workspace.close();

        assert_eq!(workspace.subscribers.len(), 1);
        let received: Vec<_> = kept.try_iter().collect();
        assert_eq!(received.last(), Some(&WorkspaceEvent::Closed));
    }
}
