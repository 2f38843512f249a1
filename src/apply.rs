//! Applying a profile to the live configuration store

use crate::error::Error;
use crate::extensions::InstallationStatus;
use crate::profile::{PreferenceEntry, PreferenceSet, ThemeKeys};
use crate::store::{ConfigStore, Scope};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// =============================================================================
// Companion extensions
// =============================================================================

/// Extensions that provide the profile's themes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companions {
    /// Owner of `workbench.colorTheme`
    pub color_theme: String,
    /// Owner of `workbench.iconTheme`
    pub icon_theme: String,
}

impl Default for Companions {
    fn default() -> Self {
        Self {
            color_theme: "aura-theme.aura-theme".into(),
            icon_theme: "moxer-icons.moxer-icons".into(),
        }
    }
}

impl Companions {
    /// Both extension ids, color theme first
    #[must_use]
    pub fn ids(&self) -> [&str; 2] {
        [&self.color_theme, &self.icon_theme]
    }
}

// =============================================================================
// Results
// =============================================================================

/// Outcome of a bulk profile write
#[derive(Debug)]
pub enum ApplyResult {
    /// Every key was written
    Applied { written: usize },

    /// Writing stopped at `key`; the `written` keys before it stay written
    Failed {
        written: usize,
        key: String,
        error: Error,
    },
}

impl ApplyResult {
    /// Number of keys written
    #[must_use]
    pub fn written(&self) -> usize {
        match self {
            Self::Applied { written } | Self::Failed { written, .. } => *written,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Outcome for a single theme key
#[derive(Debug)]
pub enum ThemeOutcome {
    /// The theme was written
    Applied,
    /// The owning extension is not installed, so the key was left alone
    Skipped { extension: String },
    /// The write failed
    Failed(Error),
    /// The profile does not set this key
    NotInProfile,
}

impl ThemeOutcome {
    /// Whether the user should hear about this outcome
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Skipped { .. } | Self::Failed(_))
    }
}

/// Outcomes for both theme keys
#[derive(Debug)]
pub struct ThemeApplyResult {
    pub color: ThemeOutcome,
    pub icon: ThemeOutcome,
}

impl ThemeApplyResult {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.color.is_warning() || self.icon.is_warning()
    }
}

// =============================================================================
// Applier
// =============================================================================

/// Writes profile values at user scope
pub struct ProfileApplier<'a, C: ConfigStore + ?Sized> {
    store: &'a mut C,
}

impl<'a, C: ConfigStore + ?Sized> ProfileApplier<'a, C> {
    pub fn new(store: &'a mut C) -> Self {
        Self { store }
    }

    /// Write every entry of `set` at user scope, in order.
    ///
    /// Stops at the first failing write. Applying the same set twice leaves
    /// the store as applying it once does.
    pub fn apply(&mut self, set: &PreferenceSet) -> ApplyResult {
        let mut written = 0;

        for entry in set {
            if let Err(error) = self.store.update(&entry.key, &entry.value, Scope::User) {
                warn!("Stopped applying '{}' at {}: {error}", set.name(), entry.key);
                return ApplyResult::Failed {
                    written,
                    key: entry.key.clone(),
                    error,
                };
            }
            debug!("Applied {}", entry.key);
            written += 1;
        }

        info!("✅ Applied {written} setting(s) from '{}'", set.name());
        ApplyResult::Applied { written }
    }

    /// Write each theme key only if the extension providing it is installed.
    ///
    /// The two keys are independent: a missing icon theme never holds back
    /// the color theme.
    pub fn apply_theme_if_provisioned(
        &mut self,
        theme_keys: &ThemeKeys,
        companions: &Companions,
        status: &InstallationStatus,
    ) -> ThemeApplyResult {
        ThemeApplyResult {
            color: self.apply_gated(theme_keys.color.as_ref(), &companions.color_theme, status),
            icon: self.apply_gated(theme_keys.icon.as_ref(), &companions.icon_theme, status),
        }
    }

    fn apply_gated(
        &mut self,
        entry: Option<&PreferenceEntry>,
        extension: &str,
        status: &InstallationStatus,
    ) -> ThemeOutcome {
        let Some(entry) = entry else {
            return ThemeOutcome::NotInProfile;
        };

        if !status.is_present(extension) {
            warn!("Skipping {}: extension {extension} is not installed", entry.key);
            return ThemeOutcome::Skipped {
                extension: extension.to_string(),
            };
        }

        match self.store.update(&entry.key, &entry.value, Scope::User) {
            Ok(()) => {
                debug!("Applied {} = {}", entry.key, entry.value);
                ThemeOutcome::Applied
            }
            Err(e) => {
                warn!("Failed to apply {}: {e}", entry.key);
                ThemeOutcome::Failed(e)
            }
        }
    }
}
