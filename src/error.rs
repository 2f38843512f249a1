//! Error types for zenforge

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for zenforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zenforge
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font source directory does not exist: {0}")]
    SourceMissing(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse JSON with comments: {0}")]
    Jsonc(#[from] json5::Error),

    #[error("Failed to parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Profile Errors
    // -------------------------------------------------------------------------
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Duplicate preference key: {0}")]
    DuplicateKey(String),

    // -------------------------------------------------------------------------
    // Configuration Store Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read setting '{key}': {reason}")]
    ConfigRead { key: String, reason: String },

    #[error("Failed to write setting '{key}': {reason}")]
    ConfigWrite { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Extension Errors
    // -------------------------------------------------------------------------
    #[error("Failed to query extension '{id}': {reason}")]
    ExtensionQuery { id: String, reason: String },

    #[error("Failed to install extension '{id}': {reason}")]
    ExtensionInstall { id: String, reason: String },

    // -------------------------------------------------------------------------
    // Backup Errors
    // -------------------------------------------------------------------------
    #[error("No settings backup found to restore")]
    NoBackup,

    #[error("Failed to restore setting '{key}': {reason}")]
    RestoreWrite { key: String, reason: String },

    #[error("Failed to read state '{name}': {reason}")]
    StateRead { name: String, reason: String },

    #[error("Failed to write state '{name}': {reason}")]
    StateWrite { name: String, reason: String },

    // -------------------------------------------------------------------------
    // Host Errors
    // -------------------------------------------------------------------------
    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Home directory not found")]
    HomeNotFound,
}

impl Error {
    /// Check if this error must abort a whole apply run.
    ///
    /// Only an unreadable configuration store is fatal: writing a profile
    /// whose previous values could not be backed up is unsafe.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ConfigRead { .. })
    }

    /// Process exit code used by the command-line host
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ConfigRead { .. } => 2,
            Error::NoBackup => 3,
            Error::SourceMissing(_) => 4,
            Error::InvalidProfile(_) | Error::DuplicateKey(_) | Error::Parse { .. } => 5,
            _ => 1,
        }
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================
// These reduce repetitive map_err patterns in the file-backed collaborators.

/// Create a directory (and parents) with proper error handling
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a file with proper error handling, overwriting the destination
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    std::fs::copy(src, dest).map_err(|e| Error::FileCopy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })
}

/// Read a file to a string with proper error handling
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read directory entry names, unmodified and sorted, with proper error handling
pub fn read_dir_names(path: &Path) -> Result<Vec<OsString>> {
    let entries = std::fs::read_dir(path).map_err(|e| Error::DirectoryRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_read_is_fatal() {
        let read = Error::ConfigRead {
            key: "editor.fontSize".into(),
            reason: "unavailable".into(),
        };
        let write = Error::ConfigWrite {
            key: "editor.fontSize".into(),
            reason: "read-only".into(),
        };

        assert!(read.is_fatal());
        assert!(!write.is_fatal());
        assert!(!Error::NoBackup.is_fatal());
        assert!(!Error::SourceMissing(PathBuf::from("fonts")).is_fatal());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::NoBackup.exit_code(), 3);
        assert_eq!(Error::HomeNotFound.exit_code(), 1);
    }

    #[test]
    fn test_read_dir_names_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.ttf"), b"b").unwrap();
        std::fs::write(dir.path().join("a.otf"), b"a").unwrap();

        let names = read_dir_names(dir.path()).unwrap();
        assert_eq!(names, vec!["a.otf", "b.ttf"]);
    }

    #[test]
    fn test_read_dir_missing() {
        let result = read_dir_names(Path::new("/nonexistent/zenforge/fonts"));
        assert!(matches!(result, Err(Error::DirectoryRead { .. })));
    }
}
