//! Types for backup and restore operations

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the durable slot holding the settings backup
pub const BACKUP_SLOT: &str = "zenforge.userSettingBackup";

/// The user's previous values for the keys a profile is about to overwrite.
///
/// Only keys that had a user or workspace override are recorded. Values are
/// kept as raw JSON so nested objects and arrays round-trip exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupSnapshot {
    values: Map<String, Value>,
}

impl BackupSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for BackupSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Outcome of replaying a snapshot
#[derive(Debug)]
pub enum RestoreResult {
    /// The user declined; nothing was written
    Declined,

    /// Every key was written back
    Restored(usize),

    /// Some keys could not be written back.
    ///
    /// `failed` holds one `Error::RestoreWrite` per key.
    PartiallyRestored { restored: usize, failed: Vec<Error> },
}

impl RestoreResult {
    /// Number of keys written back
    #[must_use]
    pub fn restored_count(&self) -> usize {
        match self {
            Self::Declined => 0,
            Self::Restored(n) => *n,
            Self::PartiallyRestored { restored, .. } => *restored,
        }
    }

    /// Per-key failures, empty unless partially restored
    #[must_use]
    pub fn failures(&self) -> &[Error] {
        match self {
            Self::PartiallyRestored { failed, .. } => failed,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }
}
