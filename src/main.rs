//! Dirtag CLI application entry point
//!
//! This is the main executable for the dirtag file tagger. It opens one
//! directory, lists its entries with their tags, and edits the tags stored in
//! the directory's sidecar file.
//!
//! # Usage
//!
//! ```bash
//! # List the current (or last used) directory
//! dirtag
//! dirtag ls -t urgent
//!
//! # Tag and untag entries
//! dirtag tag report.pdf notes.md -t work draft
//! dirtag untag notes.md -t draft
//!
//! # Manage the directory's tag vocabulary
//! dirtag vocab list
//! dirtag vocab add archive
//! dirtag vocab rm draft
//!
//! # Move around
//! dirtag open photos
//! dirtag up
//! dirtag -C ~/Documents
//! ```
//!
//! # Configuration
//!
//! Settings live in the user's config directory (`~/.config/dirtag/config.toml`
//! on Linux) and are created with defaults on first run. Set `DIRTAG_LOG` to a
//! tracing filter such as `debug` for diagnostics on stderr.

use dirtag::{
    DirtagError,
    cli::{Cli, Commands, ConfigCommands, VocabCommands},
    commands,
    config::{DirtagConfig, KEYS},
    fs::NativeFileSystem,
    ui::{DialoguerInput, OutputWriter, StdoutWriter},
    workspace::{NavigationResult, SystemLauncher, Workspace},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, DirtagError>;

/// Set up diagnostics on stderr, filtered by `DIRTAG_LOG`
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DIRTAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle config subcommands
///
/// # Errors
///
/// Returns `DirtagError` if the setting is malformed, the key is unknown, the
/// value does not parse, or the configuration cannot be saved.
fn handle_config_command(
    mut config: DirtagConfig,
    command: &ConfigCommands,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = ConfigCommands::split_setting(setting).ok_or_else(|| {
                DirtagError::InvalidInput("Invalid format. Use: dirtag config set key=value".into())
            })?;
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                output.success(&format!("Set {key} = {}", config.get(key)?));
            }
        }
        ConfigCommands::Get { key } => match config.get(key) {
            Ok(value) => output.write(&value),
            Err(_) => {
                return Err(DirtagError::InvalidInput(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    KEYS.join(", ")
                )));
            }
        },
    }
    Ok(())
}

/// Directory to open: `-C`, then the last one used if it still exists, then
/// the current directory
fn starting_directory(cli: &Cli, config: &DirtagConfig) -> Result<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Ok(dir.clone());
    }
    if let Some(last) = &config.last_directory
        && last.is_dir()
    {
        return Ok(last.clone());
    }
    Ok(std::env::current_dir()?)
}

fn handle_ls_command(
    workspace: &mut Workspace,
    name: Option<&str>,
    tag: Option<&str>,
    json: bool,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    commands::list(workspace, name, tag, json, output, quiet)
}

fn handle_vocab_command(
    workspace: &mut Workspace,
    command: &VocabCommands,
    config: &DirtagConfig,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let input = DialoguerInput::new();
    commands::vocab(workspace, command, config.confirm_removal, &input, output, quiet)
}

/// Run one command against the open directory
///
/// `config` is handled too, so every command can go through here; it does not
/// touch the workspace.
fn dispatch(
    workspace: &mut Workspace,
    command: &Commands,
    config: &DirtagConfig,
    output: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Ls { name, tag, json } => {
            handle_ls_command(workspace, name.as_deref(), tag.as_deref(), *json, output, quiet)
        }
        Commands::Vocab { command } => handle_vocab_command(workspace, command, config, output, quiet),
        Commands::Tag { entries, tags } => commands::tag(workspace, entries, tags, output, quiet),
        Commands::Untag { entries, tags } => commands::untag(workspace, entries, tags, output, quiet),
        Commands::Open { entry } => commands::open(workspace, entry, &SystemLauncher, output, quiet),
        Commands::Up => commands::up(workspace, output, quiet),
        Commands::Config { command } => handle_config_command(config.clone(), command, output, quiet),
    }
}

/// Open the starting directory and report its load warnings
fn open_workspace(cli: &Cli, config: &DirtagConfig, output: &dyn OutputWriter) -> Result<Workspace> {
    let dir = starting_directory(cli, config)?;
    let mut workspace = Workspace::new(Arc::new(NativeFileSystem::new()), config.loader_options());
    match workspace.go_to(&dir)? {
        Some(NavigationResult::Installed { warnings }) => commands::report_warnings(&warnings, output),
        Some(NavigationResult::Stale { .. }) | None => {
            return Err(DirtagError::InvalidInput(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }
    }
    Ok(workspace)
}

fn run(cli: &Cli, mut config: DirtagConfig, output: &dyn OutputWriter, quiet: bool) -> Result<()> {
    let command = cli.get_command();

    // Settings can be fixed even when the remembered directory is gone
    if let Commands::Config { command } = &command {
        return handle_config_command(config, command, output, quiet);
    }

    let mut workspace = open_workspace(cli, &config, output)?;
    dispatch(&mut workspace, &command, &config, output, quiet)?;

    if let Some(session) = workspace.session() {
        let dir = session.dir().to_path_buf();
        if config.last_directory.as_ref() != Some(&dir) {
            config.last_directory = Some(dir);
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "could not remember last directory");
            }
        }
    }
    Ok(())
}

/// Main entry point for the dirtag application
///
/// Loads configuration, parses command-line arguments, and dispatches to the
/// appropriate command handler. Errors are printed and exit with status 1.
fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    let config = match DirtagConfig::load() {
        Ok(config) => config,
        Err(e) => {
            StdoutWriter::new().error(&format!("Configuration error: {e}"));
            std::process::exit(1);
        }
    };

    let quiet = cli.quiet || config.quiet;
    let output = StdoutWriter::quiet(quiet);

    if let Err(e) = run(&cli, config, &output, quiet) {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}
