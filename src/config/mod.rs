//! Configuration module for dirtag
//!
//! Manages user preferences and the last directory visited. Configuration is
//! stored in the user's config directory as `dirtag/config.toml`.

use crate::loader::LoaderOptions;
use crate::store::sidecar::DEFAULT_SIDECAR_NAME;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by [`DirtagConfig::get`] and [`DirtagConfig::set`]
pub const KEYS: &[&str] = &[
    "sidecar_name",
    "show_hidden",
    "backup_sidecar",
    "confirm_removal",
    "quiet",
    "last_directory",
];

fn default_sidecar_name() -> String {
    DEFAULT_SIDECAR_NAME.to_string()
}

const fn default_true() -> bool {
    true
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DirtagConfig {
    /// File name of the per-directory tag file
    #[serde(default = "default_sidecar_name")]
    pub sidecar_name: String,

    /// List entries whose names start with a dot
    #[serde(default)]
    pub show_hidden: bool,

    /// Keep a `.bak` copy of the tag file before each write
    #[serde(default)]
    pub backup_sidecar: bool,

    /// Ask before removing tags from the vocabulary
    #[serde(default = "default_true")]
    pub confirm_removal: bool,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Directory used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
}

impl Default for DirtagConfig {
    fn default() -> Self {
        Self {
            sidecar_name: default_sidecar_name(),
            show_hidden: false,
            backup_sidecar: false,
            confirm_removal: true,
            quiet: false,
            last_directory: None,
        }
    }
}

impl DirtagConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("dirtag").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing the defaults there if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Loader settings derived from this configuration
    #[must_use]
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            sidecar_name: self.sidecar_name.clone(),
            show_hidden: self.show_hidden,
            backup_sidecar: self.backup_sidecar,
        }
    }

    /// Current value of `key` as text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for an unknown key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "sidecar_name" => self.sidecar_name.clone(),
            "show_hidden" => self.show_hidden.to_string(),
            "backup_sidecar" => self.backup_sidecar.to_string(),
            "confirm_removal" => self.confirm_removal.to_string(),
            "quiet" => self.quiet.to_string(),
            "last_directory" => self
                .last_directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Change `key` from its text form
    ///
    /// An empty value clears `last_directory`. The change is not saved.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for an unknown key and
    /// `ConfigError::Message` for a value of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "sidecar_name" => {
                let name = value.trim();
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err(ConfigError::Message(format!(
                        "Invalid value for sidecar_name: '{value}'. Use a plain file name"
                    )));
                }
                self.sidecar_name = name.to_string();
            }
            "show_hidden" => self.show_hidden = parse_bool(key, value)?,
            "backup_sidecar" => self.backup_sidecar = parse_bool(key, value)?,
            "confirm_removal" => self.confirm_removal = parse_bool(key, value)?,
            "quiet" => self.quiet = parse_bool(key, value)?,
            "last_directory" => {
                let value = value.trim();
                self.last_directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| {
        ConfigError::Message(format!(
            "Invalid value for {key}: '{value}'. Use 'true' or 'false'"
        ))
    })
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::NotFound(format!("{key} (available keys: {})", KEYS.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DirtagConfig::default();
        assert_eq!(config.sidecar_name, "tags.dirtag");
        assert!(!config.show_hidden);
        assert!(config.confirm_removal);
        assert!(config.last_directory.is_none());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirtag").join("config.toml");

        let config = DirtagConfig::load_from(&path).unwrap();
        assert_eq!(config, DirtagConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = DirtagConfig::default();
        config.backup_sidecar = true;
        config.last_directory = Some(PathBuf::from("/home/me/photos"));
        config.save_to(&path).unwrap();

        assert_eq!(DirtagConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "quiet = true\n").unwrap();

        let config = DirtagConfig::load_from(&path).unwrap();
        assert!(config.quiet);
        assert_eq!(config.sidecar_name, "tags.dirtag");
        assert!(config.confirm_removal);
    }

    #[test]
    fn test_get_and_set() {
        let mut config = DirtagConfig::default();
        config.set("show_hidden", "true").unwrap();
        config.set("sidecar_name", " .tags ").unwrap();
        config.set("last_directory", "/tmp/x").unwrap();

        assert_eq!(config.get("show_hidden").unwrap(), "true");
        assert_eq!(config.get("sidecar_name").unwrap(), ".tags");
        assert_eq!(config.get("last_directory").unwrap(), "/tmp/x");

        config.set("last_directory", "").unwrap();
        assert!(config.last_directory.is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = DirtagConfig::default();
        assert!(config.set("quiet", "maybe").is_err());
        assert!(config.set("sidecar_name", "a/b").is_err());
        assert!(config.set("sidecar_name", "  ").is_err());
        assert!(matches!(config.set("colour", "red"), Err(ConfigError::NotFound(_))));
        assert!(matches!(config.get("colour"), Err(ConfigError::NotFound(_))));
        assert_eq!(config, DirtagConfig::default());
    }

    #[test]
    fn test_loader_options() {
        let mut config = DirtagConfig::default();
        config.show_hidden = true;
        let options = config.loader_options();
        assert!(options.show_hidden);
        assert_eq!(options.sidecar_name, "tags.dirtag");
    }
}
