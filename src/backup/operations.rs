//! Taking and loading the settings backup

use super::types::{BACKUP_SLOT, BackupSnapshot};
use crate::error::{Error, Result};
use crate::state::StateSlot;
use crate::store::ConfigStore;

use log::{debug, info};

/// Backup store for settings snapshots
///
/// Borrows the durable state slot for the duration of one operation.
pub struct BackupStore<'a, T: StateSlot + ?Sized> {
    pub(super) slot: &'a mut T,
}

impl<'a, T: StateSlot + ?Sized> BackupStore<'a, T> {
    pub fn new(slot: &'a mut T) -> Self {
        Self { slot }
    }

    /// Snapshot the current overrides of `keys` and persist them.
    ///
    /// Every key is inspected before anything is written, and exactly one
    /// durable write follows: the snapshot, or the cleared marker when none
    /// of the keys had a user or workspace override. Defaults are never
    /// recorded; a user value wins over a workspace value.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigRead` if any key cannot be inspected (nothing is
    /// written in that case), or `Error::StateWrite` if persisting fails.
    pub fn save<C, I, K>(&mut self, store: &C, keys: I) -> Result<BackupSnapshot>
    where
        C: ConfigStore + ?Sized,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut snapshot = BackupSnapshot::new();

        for key in keys {
            let key = key.as_ref();
            let inspection = store.inspect(key).map_err(|e| match e {
                Error::ConfigRead { .. } => e,
                other => Error::ConfigRead {
                    key: key.to_string(),
                    reason: other.to_string(),
                },
            })?;

            if let Some(resolved) = inspection.override_value() {
                debug!("Backing up {key} ({} scope)", resolved.scope);
                snapshot.insert(key, resolved.value.clone());
            }
        }

        if snapshot.is_empty() {
            self.slot.set(BACKUP_SLOT, None)?;
            info!("No existing overrides, backup cleared");
        } else {
            self.slot
                .set(BACKUP_SLOT, Some(serde_json::to_value(&snapshot)?))?;
            info!("💾 Backed up {} setting(s)", snapshot.len());
        }

        Ok(snapshot)
    }

    /// Load the stored snapshot.
    ///
    /// Returns `None` when nothing was ever saved or the backup was cleared.
    ///
    /// # Errors
    ///
    /// Returns `Error::StateRead` if the slot cannot be read or does not hold
    /// a key-value mapping.
    pub fn load(&self) -> Result<Option<BackupSnapshot>> {
        let Some(value) = self.slot.get(BACKUP_SLOT)? else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::StateRead {
                name: BACKUP_SLOT.to_string(),
                reason: e.to_string(),
            })
    }
}
