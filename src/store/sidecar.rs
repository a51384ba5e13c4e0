//! Sidecar file persistence
//!
//! Each directory keeps its tag data in one file next to its entries. The
//! file holds:
//!
//! ```text
//! +--------+---------+-------------------------------------------+
//! | "DTAG" | version | bincode(TagInfo { AllTags, TagDict })     |
//! | 4 B    | 1 B     | serde, standard config                    |
//! +--------+---------+-------------------------------------------+
//! ```
//!
//! Writes go to a temp file in the same directory that is renamed over the
//! sidecar, so a crash mid-write leaves the previous file intact.

use super::error::StoreError;
use crate::catalog::TagSet;
use crate::fs::{Identifier, SIDECAR_TEMP_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default sidecar file name
pub const DEFAULT_SIDECAR_NAME: &str = "tags.dirtag";

const MAGIC: &[u8; 4] = b"DTAG";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1;

/// Serialized tag record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Vocabulary
    #[serde(rename = "AllTags")]
    pub all_tags: TagSet,

    /// Assignments; `None` means no tags were ever recorded
    #[serde(rename = "TagDict")]
    pub tag_dict: BTreeMap<Identifier, Option<TagSet>>,
}

/// Location and write policy of one directory's sidecar file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    path: PathBuf,
    backup: bool,
}

impl Sidecar {
    /// Sidecar named `file_name` inside `dir`
    #[must_use]
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
            backup: false,
        }
    }

    /// Copy the previous file to `<sidecar>.bak` before each save
    #[must_use]
    pub const fn with_backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup copy
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Read the sidecar
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read and
    /// `StoreError::Corrupt` if its content is not a valid tag record.
    pub fn load(&self) -> Result<Option<TagInfo>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        decode(&self.path, &bytes).map(Some)
    }

    /// Write the sidecar atomically
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if the record cannot be serialized and
    /// `StoreError::Io` if the backup, temp file or rename fails.
    pub fn save(&self, info: &TagInfo) -> Result<(), StoreError> {
        let bytes = encode(info)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));

        if self.backup && self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|e| StoreError::io(&backup, e))?;
        }

        let mut tmp = tempfile::Builder::new()
            .prefix(SIDECAR_TEMP_PREFIX)
            .tempfile_in(dir)
            .map_err(|e| StoreError::io(dir, e))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        tmp.flush().map_err(|e| StoreError::io(&tmp_path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "saved tag file");
        Ok(())
    }
}

/// Encode a tag record with its header
///
/// # Errors
///
/// Returns `StoreError::Encode` if bincode serialization fails.
pub fn encode(info: &TagInfo) -> Result<Vec<u8>, StoreError> {
    let payload = bincode::serde::encode_to_vec(info, bincode::config::standard())?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a tag record read from `path`
///
/// # Errors
///
/// Returns `StoreError::Corrupt` on a bad header, an unknown version, a
/// decode failure or trailing bytes.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<TagInfo, StoreError> {
    let Some(header) = bytes.get(..HEADER_LEN) else {
        return Err(StoreError::corrupt(path, "file is shorter than its header"));
    };
    if &header[..MAGIC.len()] != MAGIC {
        return Err(StoreError::corrupt(path, "not a dirtag file"));
    }
    let version = header[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(StoreError::corrupt(
            path,
            format!("unsupported format version {version}"),
        ));
    }

    let payload = &bytes[HEADER_LEN..];
    let (info, read): (TagInfo, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| StoreError::corrupt(path, e.to_string()))?;
    if read != payload.len() {
        return Err(StoreError::corrupt(
            path,
            format!("{} trailing bytes", payload.len() - read),
        ));
    }
    Ok(info)
}
