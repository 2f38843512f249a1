//! Replaying a snapshot into the configuration store

use super::types::{BackupSnapshot, RestoreResult};
use crate::error::{Error, Result};
use crate::state::StateSlot;
use crate::store::{ConfigStore, Scope};

use log::{debug, info, warn};

impl<T: StateSlot + ?Sized> super::BackupStore<'_, T> {
    /// Write a snapshot back at user scope.
    ///
    /// Writes are best-effort: a failing key is recorded and the remaining
    /// keys are still attempted. Nothing is written unless `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoBackup` when `snapshot` is absent or empty; this is
    /// checked before `confirmed`.
    pub fn restore<C: ConfigStore + ?Sized>(
        &self,
        store: &mut C,
        snapshot: Option<&BackupSnapshot>,
        confirmed: bool,
    ) -> Result<RestoreResult> {
        let snapshot = match snapshot {
            Some(s) if !s.is_empty() => s,
            _ => return Err(Error::NoBackup),
        };

        if !confirmed {
            info!("Restore declined, {} setting(s) left untouched", snapshot.len());
            return Ok(RestoreResult::Declined);
        }

        info!("Restoring {} setting(s) from backup", snapshot.len());

        let mut restored = 0;
        let mut failed = Vec::new();
        for (key, value) in snapshot.iter() {
            match store.update(key, value, Scope::User) {
                Ok(()) => {
                    debug!("Restored {key}");
                    restored += 1;
                }
                Err(e) => {
                    warn!("Failed to restore {key}: {e}");
                    failed.push(Error::RestoreWrite {
                        key: key.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if failed.is_empty() {
            Ok(RestoreResult::Restored(restored))
        } else {
            Ok(RestoreResult::PartiallyRestored { restored, failed })
        }
    }
}
