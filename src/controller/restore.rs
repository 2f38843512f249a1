//! Reverting to the backed-up settings

use super::confirmed;
use crate::backup::{BackupStore, RestoreResult};
use crate::error::{Error, Result};
use crate::prompt::{Notice, Prompt};
use crate::state::StateSlot;
use crate::store::ConfigStore;

/// Restore workflow: load the backup, confirm, write it back
pub struct RestoreController<'a> {
    store: &'a mut dyn ConfigStore,
    state: &'a mut dyn StateSlot,
    prompt: &'a mut dyn Prompt,
}

impl<'a> RestoreController<'a> {
    pub fn new(
        store: &'a mut dyn ConfigStore,
        state: &'a mut dyn StateSlot,
        prompt: &'a mut dyn Prompt,
    ) -> Self {
        Self {
            store,
            state,
            prompt,
        }
    }

    /// Offer to restore the stored backup.
    ///
    /// The user is only asked when there is something to restore.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoBackup` when no backup is stored (or it was cleared),
    /// or the error that prevented the backup from being loaded. Per-key write
    /// failures are reported in the result instead.
    pub fn run(&mut self) -> Result<RestoreResult> {
        let result = self.restore();
        let (notice, message) = match &result {
            Ok(RestoreResult::Declined) => (
                Notice::Info,
                "Restore cancelled, settings left unchanged.".to_string(),
            ),
            Ok(RestoreResult::Restored(n)) => (
                Notice::Info,
                format!("Restored {n} setting(s) from backup."),
            ),
            Ok(RestoreResult::PartiallyRestored { restored, failed }) => {
                let reasons: Vec<String> = failed.iter().map(ToString::to_string).collect();
                (
                    Notice::Warning,
                    format!(
                        "Restored {restored} setting(s), {} could not be restored: {}",
                        failed.len(),
                        reasons.join("; ")
                    ),
                )
            }
            Err(Error::NoBackup) => (
                Notice::Info,
                "No settings backup found to restore.".to_string(),
            ),
            Err(e) => (Notice::Error, format!("Failed to restore settings: {e}")),
        };
        self.prompt.notify(notice, &message);
        result
    }

    fn restore(&mut self) -> Result<RestoreResult> {
        let backups = BackupStore::new(&mut *self.state);
        let snapshot = backups.load()?;

        // Nothing to offer: fail before asking
        let Some(snapshot) = snapshot.filter(|s| !s.is_empty()) else {
            return backups.restore(&mut *self.store, None, false);
        };

        let question = format!(
            "Restore the {} setting(s) you had before the profile was applied?",
            snapshot.len()
        );
        let yes = confirmed(&mut *self.prompt, &question);
        backups.restore(&mut *self.store, Some(&snapshot), yes)
    }
}
