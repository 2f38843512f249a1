//! On-disk formats for settings and state files
//!
//! Every file zenforge touches is read and written through a [`StorageBackend`].
//! Writes are atomic: the content lands in a sibling `.tmp` file that is then
//! renamed over the target, so the editor never observes a half-written
//! `settings.json`.

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Format used to persist a document.
///
/// Both the editor settings files and the zenforge state file go through a
/// backend, so tests and embedders can swap the on-disk format.
pub trait StorageBackend: Clone + Send + Sync {
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and decode a file.
    ///
    /// # Errors
    ///
    /// `Error::FileRead` if the file cannot be read, `Error::Parse` (carrying
    /// the path) if its content does not decode.
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = crate::error::read_file(path)?;
        self.deserialize(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like [`StorageBackend::read`], but a missing file is `None`
    ///
    /// # Errors
    ///
    /// Same as [`StorageBackend::read`] for a file that exists.
    fn read_optional<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        self.read(path).map(Some)
    }

    /// Encode and atomically replace a file, creating missing parent dirs.
    ///
    /// # Errors
    ///
    /// `Error::FileWrite` if the temp file cannot be written or renamed.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            crate::error::create_dir(parent)?;
        }

        // settings.json -> settings.json.tmp, next to the target
        let mut staged = path
            .file_name()
            .ok_or_else(|| Error::Config(format!("'{}' does not name a file", path.display())))?
            .to_os_string();
        staged.push(".tmp");
        let staged = path.with_file_name(staged);

        std::fs::write(&staged, content).map_err(|source| Error::FileWrite {
            path: staged.clone(),
            source,
        })?;
        std::fs::rename(&staged, path).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Pretty-printed JSON, optionally accepting the editor's JSONC dialect
#[derive(Debug, Clone, Default)]
pub struct JsonStorage {
    jsonc: bool,
}

impl JsonStorage {
    /// Strict JSON, used for the state file
    #[must_use]
    pub fn new() -> Self {
        Self { jsonc: false }
    }

    /// Also read `//` and `/* */` comments and trailing commas, the dialect
    /// editors use for their `settings.json` files.
    ///
    /// Comments are dropped when the file is written back.
    #[must_use]
    pub fn jsonc() -> Self {
        Self { jsonc: true }
    }
}

impl StorageBackend for JsonStorage {
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        let mut out = serde_json::to_string_pretty(data)?;
        out.push('\n');
        Ok(out)
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        // JSONC is read as JSON5, a superset covering comments and trailing commas
        if self.jsonc {
            Ok(json5::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
