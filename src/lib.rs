//! # zenforge - editor profile installer
//!
//! Applies a bundled editor profile (theme, fonts, layout and keybinding
//! preferences for a VS Code style editor), installs the companion theme
//! extensions and copies the bundled fonts into the user's font directory.
//! The user's previous values are backed up first and can be restored later.
//!
//! ## Features
//!
//! - **Profiles**: An immutable, versioned [`PreferenceSet`] with every entry
//!   tagged as core or optional (the Neovim / which-key group)
//! - **Backup & Restore**: Snapshots of the user's own overrides, kept in a
//!   durable [`StateSlot`] and replayed on request
//! - **Theme gating**: Theme keys are only written once the extension that
//!   provides them is installed
//! - **Fonts**: TrueType/OpenType files copied into the platform font directory
//! - **Pluggable hosts**: Every side effect goes through a small trait
//!   ([`ConfigStore`], [`StateSlot`], [`ExtensionRegistry`], [`Prompt`],
//!   [`Filesystem`]), with file-backed and in-memory implementations included
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zenforge::{
//!     AssumeYes, Collaborators, ConsentController, ConsolePrompt, PreferenceSet, StdFilesystem,
//!     ZenforgeConfig,
//! };
//!
//! # fn example() -> zenforge::Result<()> {
//! let config = ZenforgeConfig::builder()
//!     .user_settings("~/.config/Code/User/settings.json")
//!     .fonts_dir("./fonts")
//!     .build();
//!
//! let mut store = config.settings_store();
//! let mut state = config.state_slot();
//! let mut registry = config.editor_cli();
//! let mut prompt = AssumeYes::new(ConsolePrompt::stdio());
//! let mut fs = StdFilesystem;
//!
//! let report = ConsentController::new(
//!     Collaborators {
//!         store: &mut store,
//!         state: &mut state,
//!         registry: &mut registry,
//!         prompt: &mut prompt,
//!         fs: &mut fs,
//!     },
//!     &config,
//! )
//! .run(&PreferenceSet::bundled()?);
//!
//! println!("finished in {:?}", report.state());
//! # Ok(())
//! # }
//! ```
//!
//! ## Backup Semantics
//!
//! Only keys with a user or workspace override are backed up; editor defaults
//! never are. When none of the profile's keys had an override, the backup slot
//! is explicitly cleared rather than left holding an empty mapping, and a
//! later restore reports that there is nothing to restore.
//!
//! ```rust
//! use serde_json::json;
//! use zenforge::{BackupStore, MemoryConfigStore, MemoryStateSlot};
//!
//! # fn example() -> zenforge::Result<()> {
//! let store = MemoryConfigStore::new()
//!     .with_user("editor.fontSize", json!(10))
//!     .with_workspace("editor.fontSize", json!(12));
//! let mut slot = MemoryStateSlot::new();
//!
//! let snapshot = BackupStore::new(&mut slot).save(&store, ["editor.fontSize"])?;
//! assert_eq!(snapshot.get("editor.fontSize"), Some(&json!(10)));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod error;

pub mod apply;
pub mod backup;
pub mod config;
pub mod controller;
pub mod extensions;
pub mod fonts;
pub mod profile;
pub mod prompt;
pub mod state;
pub mod storage;
pub mod store;

pub use error::{Error, Result};

pub use apply::{ApplyResult, Companions, ProfileApplier, ThemeApplyResult, ThemeOutcome};
pub use backup::{BACKUP_SLOT, BackupSnapshot, BackupStore, RestoreResult};
pub use config::{ZenforgeConfig, ZenforgeConfigBuilder};
pub use controller::{
    APPLY_NEOVIM_KEY, Collaborators, ConsentController, FontController, RestoreController,
    RunReport, RunState,
};
pub use extensions::{
    EditorCli, ExtensionProvisioner, ExtensionRegistry, ExtensionState, InstallationStatus,
};
pub use fonts::{
    Filesystem, FontInstaller, FontOutcome, Platform, StdFilesystem, is_installable_font,
};
pub use profile::{
    COLOR_THEME_KEY, ICON_THEME_KEY, PreferenceEntry, PreferenceGroup, PreferenceSet, ThemeKeys,
    extract_theme_keys, filter_excluding_optional_group,
};
pub use prompt::{AssumeYes, ConsolePrompt, Notice, Prompt};
pub use state::{JsonStateFile, MemoryStateSlot, StateSlot};
pub use storage::{JsonStorage, StorageBackend};
pub use store::{ConfigStore, Inspection, MemoryConfigStore, Resolved, Scope, SettingsFileStore};
