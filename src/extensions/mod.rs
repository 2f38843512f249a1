//! Companion extension provisioning
//!
//! The profile's theme keys only make sense once the extensions that ship
//! those themes are installed. [`ExtensionProvisioner`] makes sure they are,
//! recording per-extension results in an [`InstallationStatus`].

mod cli;

pub use cli::{DEFAULT_EDITOR_COMMAND, EditorCli};

use crate::error::Result;
use log::{debug, info, warn};

/// The editor's extension installation mechanism
pub trait ExtensionRegistry {
    /// Whether the extension is installed.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExtensionQuery` if the registry cannot be queried.
    fn is_present(&self, id: &str) -> Result<bool>;

    /// Install the extension.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExtensionInstall` if installation fails.
    fn install(&mut self, id: &str) -> Result<()>;
}

/// What happened to one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionState {
    /// Already installed before the run
    AlreadyPresent,
    /// Installed during the run
    Installed,
    /// Installation failed, with the reason
    Failed(String),
}

impl ExtensionState {
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Per-extension results of one provisioning pass, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationStatus {
    entries: Vec<(String, ExtensionState)>,
}

impl InstallationStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of an extension, replacing any earlier record
    pub fn record(&mut self, id: impl Into<String>, state: ExtensionState) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = state,
            None => self.entries.push((id, state)),
        }
    }

    pub fn state(&self, id: &str) -> Option<&ExtensionState> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, state)| state)
    }

    /// Whether the extension is installed after the pass.
    ///
    /// Extensions that were never requested are not present.
    #[must_use]
    pub fn is_present(&self, id: &str) -> bool {
        self.state(id).is_some_and(ExtensionState::is_present)
    }

    #[must_use]
    pub fn all_present(&self) -> bool {
        self.entries.iter().all(|(_, state)| state.is_present())
    }

    /// Extensions that failed to install, with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(id, state)| match state {
            ExtensionState::Failed(reason) => Some((id.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionState)> {
        self.entries.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Installs missing companion extensions
pub struct ExtensionProvisioner<'a, R: ExtensionRegistry + ?Sized> {
    registry: &'a mut R,
}

impl<'a, R: ExtensionRegistry + ?Sized> ExtensionProvisioner<'a, R> {
    pub fn new(registry: &'a mut R) -> Self {
        Self { registry }
    }

    /// Make sure every extension in `ids` is installed.
    ///
    /// Ids are handled in order and a failure never stops the pass; nothing
    /// is rolled back. A failed presence query counts as "not installed" and
    /// leads to an install attempt.
    pub fn ensure<I, K>(&mut self, ids: I) -> InstallationStatus
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut status = InstallationStatus::new();

        for id in ids {
            let id = id.as_ref();
            let present = self.registry.is_present(id).unwrap_or_else(|e| {
                warn!("Could not check extension {id}, assuming it is missing: {e}");
                false
            });

            if present {
                debug!("Extension {id} already installed");
                status.record(id, ExtensionState::AlreadyPresent);
                continue;
            }

            match self.registry.install(id) {
                Ok(()) => {
                    info!("🧩 Installed extension {id}");
                    status.record(id, ExtensionState::Installed);
                }
                Err(e) => {
                    warn!("Failed to install extension {id}: {e}");
                    status.record(id, ExtensionState::Failed(e.to_string()));
                }
            }
        }

        status
    }
}
