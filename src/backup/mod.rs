//! Settings backup and restore
//!
//! Before a profile is applied, the user's own values for the affected keys
//! are copied into a durable slot so they can be written back later.

mod operations;
mod restore;
mod types;

pub use operations::BackupStore;
pub use types::{BACKUP_SLOT, BackupSnapshot, RestoreResult};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::state::{MemoryStateSlot, StateSlot};
    use crate::store::{ConfigStore, Inspection, MemoryConfigStore, Scope};
    use serde_json::{Value, json};

    /// Store whose reads or writes fail for chosen keys
    struct FlakyStore {
        inner: MemoryConfigStore,
        unreadable: Vec<&'static str>,
        unwritable: Vec<&'static str>,
        writes: usize,
    }

    impl FlakyStore {
        fn new(inner: MemoryConfigStore) -> Self {
            Self {
                inner,
                unreadable: Vec::new(),
                unwritable: Vec::new(),
                writes: 0,
            }
        }
    }

    impl ConfigStore for FlakyStore {
        fn inspect(&self, key: &str) -> Result<Inspection> {
            if self.unreadable.iter().any(|k| *k == key) {
                return Err(Error::ConfigRead {
                    key: key.into(),
                    reason: "locked".into(),
                });
            }
            self.inner.inspect(key)
        }

        fn update(&mut self, key: &str, value: &Value, scope: Scope) -> Result<()> {
            self.writes += 1;
            if self.unwritable.iter().any(|k| *k == key) {
                return Err(Error::ConfigWrite {
                    key: key.into(),
                    reason: "read-only".into(),
                });
            }
            self.inner.update(key, value, scope)
        }
    }

    fn snapshot(pairs: &[(&str, Value)]) -> BackupSnapshot {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_save_user_value_wins_over_workspace() {
        let store = MemoryConfigStore::new()
            .with_user("editor.fontSize", json!(10))
            .with_workspace("editor.fontSize", json!(12))
            .with_workspace("editor.tabSize", json!(8))
            .with_default("editor.wordWrap", json!("off"));
        let mut slot = MemoryStateSlot::new();

        let saved = BackupStore::new(&mut slot)
            .save(&store, ["editor.fontSize", "editor.tabSize", "editor.wordWrap"])
            .unwrap();

        assert_eq!(saved.get("editor.fontSize"), Some(&json!(10)));
        assert_eq!(saved.get("editor.tabSize"), Some(&json!(8)));
        // Defaults are never backed up
        assert!(!saved.contains_key("editor.wordWrap"));
        assert_eq!(slot.writes(), 1);
        assert_eq!(BackupStore::new(&mut slot).load().unwrap(), Some(saved));
    }

    #[test]
    fn test_save_without_overrides_writes_marker() {
        let store = MemoryConfigStore::new().with_default("editor.fontSize", json!(14));
        let mut slot = MemoryStateSlot::new();

        let saved = BackupStore::new(&mut slot)
            .save(&store, ["editor.fontSize", "files.autoSave"])
            .unwrap();

        assert!(saved.is_empty());
        assert!(slot.is_cleared(BACKUP_SLOT));
        assert!(BackupStore::new(&mut slot).load().unwrap().is_none());
    }

    #[test]
    fn test_save_read_failure_writes_nothing() {
        let mut store =
            FlakyStore::new(MemoryConfigStore::new().with_user("editor.fontSize", json!(10)));
        store.unreadable.push("editor.tabSize");
        let mut slot = MemoryStateSlot::new();

        let result =
            BackupStore::new(&mut slot).save(&store, ["editor.fontSize", "editor.tabSize"]);

        assert!(matches!(result, Err(Error::ConfigRead { .. })));
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_save_replaces_previous_backup() {
        let mut slot = MemoryStateSlot::new();
        let first = MemoryConfigStore::new().with_user("editor.fontSize", json!(10));
        BackupStore::new(&mut slot).save(&first, ["editor.fontSize"]).unwrap();

        let second = MemoryConfigStore::new();
        BackupStore::new(&mut slot).save(&second, ["editor.fontSize"]).unwrap();

        assert!(BackupStore::new(&mut slot).load().unwrap().is_none());
    }

    #[test]
    fn test_load_rejects_non_mapping() {
        let mut slot = MemoryStateSlot::new();
        slot.set(BACKUP_SLOT, Some(json!([1, 2]))).unwrap();

        assert!(matches!(
            BackupStore::new(&mut slot).load(),
            Err(Error::StateRead { .. })
        ));
    }

    #[test]
    fn test_restore_declined_writes_nothing() {
        let mut store = FlakyStore::new(MemoryConfigStore::new());
        let mut slot = MemoryStateSlot::new();
        let backup = snapshot(&[("editor.fontSize", json!(10))]);

        let result = BackupStore::new(&mut slot)
            .restore(&mut store, Some(&backup), false)
            .unwrap();

        assert!(result.is_declined());
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_restore_without_backup_fails() {
        let mut store = FlakyStore::new(MemoryConfigStore::new());
        let mut slot = MemoryStateSlot::new();
        let backups = BackupStore::new(&mut slot);

        assert!(matches!(
            backups.restore(&mut store, None, true),
            Err(Error::NoBackup)
        ));
        // A cleared backup is no backup, even when unconfirmed
        assert!(matches!(
            backups.restore(&mut store, Some(&BackupSnapshot::new()), false),
            Err(Error::NoBackup)
        ));
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_restore_round_trips_nested_values() {
        let colors = json!({
            "[Aura Dark]": {"editor.background": "#110f17", "tab.border": "#110f17"}
        });
        let bindings = json!([
            {"key": "w", "name": "Save", "command": "workbench.action.files.save"}
        ]);
        let backup = snapshot(&[
            ("workbench.colorCustomizations", colors.clone()),
            ("whichkey.bindings", bindings.clone()),
            ("editor.minimap.enabled", json!(true)),
        ]);
        let mut store = FlakyStore::new(MemoryConfigStore::new());
        let mut slot = MemoryStateSlot::new();

        let result = BackupStore::new(&mut slot)
            .restore(&mut store, Some(&backup), true)
            .unwrap();

        assert!(matches!(result, RestoreResult::Restored(3)));
        assert_eq!(store.inner.get("workbench.colorCustomizations", Scope::User), Some(&colors));
        assert_eq!(store.inner.get("whichkey.bindings", Scope::User), Some(&bindings));
    }

    #[test]
    fn test_restore_continues_past_failures() {
        let backup = snapshot(&[
            ("editor.fontSize", json!(10)),
            ("editor.tabSize", json!(8)),
            ("files.autoSave", json!("off")),
        ]);
        let mut store = FlakyStore::new(MemoryConfigStore::new());
        store.unwritable.push("editor.tabSize");
        let mut slot = MemoryStateSlot::new();

        let result = BackupStore::new(&mut slot)
            .restore(&mut store, Some(&backup), true)
            .unwrap();

        assert_eq!(store.writes, 3);
        assert_eq!(result.restored_count(), 2);
        assert!(matches!(
            result.failures(),
            [Error::RestoreWrite { key, .. }] if key == "editor.tabSize"
        ));
    }
}
