//! Durable process-wide key-value state
//!
//! zenforge keeps exactly one durable value, the settings backup, but the
//! slot is addressed by name so the state file can grow without a format
//! change.

use crate::error::{Error, Result};
use crate::storage::{JsonStorage, StorageBackend};

use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Durable named values that survive between runs
pub trait StateSlot {
    /// Read a value; `None` when it was never set or was cleared.
    ///
    /// # Errors
    ///
    /// Returns `Error::StateRead` if the backing store cannot be read.
    fn get(&self, name: &str) -> Result<Option<Value>>;

    /// Replace a value; `None` stores the explicit cleared marker.
    ///
    /// # Errors
    ///
    /// Returns `Error::StateWrite` if the value cannot be persisted.
    fn set(&mut self, name: &str, value: Option<Value>) -> Result<()>;
}

// =============================================================================
// In-memory slot
// =============================================================================

/// State that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStateSlot {
    values: HashMap<String, Option<Value>>,
    writes: usize,
}

impl MemoryStateSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Whether `name` holds the explicit cleared marker (as opposed to never set)
    pub fn is_cleared(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(None))
    }
}

impl StateSlot for MemoryStateSlot {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.values.get(name).cloned().flatten())
    }

    fn set(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        self.values.insert(name.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

// =============================================================================
// JSON state file
// =============================================================================

/// State persisted as a JSON object in a single file.
///
/// A cleared value is stored as `null` so the file records that the slot was
/// deliberately emptied.
#[derive(Debug, Clone)]
pub struct JsonStateFile<S: StorageBackend = JsonStorage> {
    path: PathBuf,
    storage: S,
}

impl JsonStateFile<JsonStorage> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            storage: JsonStorage::new(),
        }
    }
}

impl<S: StorageBackend> JsonStateFile<S> {
    pub fn with_storage(path: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            path: path.into(),
            storage,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        Ok(self
            .storage
            .read_optional::<Map<String, Value>>(&self.path)?
            .unwrap_or_default())
    }
}

impl<S: StorageBackend> StateSlot for JsonStateFile<S> {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        let all = self.read_all().map_err(|e| Error::StateRead {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(all.get(name).filter(|v| !v.is_null()).cloned())
    }

    fn set(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        let write_error = |e: Error| Error::StateWrite {
            name: name.to_string(),
            reason: e.to_string(),
        };

        let mut all = self.read_all().map_err(write_error)?;
        all.insert(name.to_string(), value.unwrap_or(Value::Null));
        self.storage.write(&self.path, &all).map_err(write_error)?;

        debug!("Persisted state '{name}' to {}", self.path.display());
        Ok(())
    }
}
