//! Live configuration store
//!
//! The editor owns its configuration; zenforge only reads the layered view of
//! a key and writes values at a given scope. [`ConfigStore`] is that seam.
//!
//! - [`MemoryConfigStore`] - in-process store for embedding and tests
//! - [`SettingsFileStore`] - the editor's user and workspace `settings.json`

mod file;
mod memory;

pub use file::SettingsFileStore;
pub use memory::MemoryConfigStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layer a configuration value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// User-global settings
    User,
    /// Settings of the open workspace
    Workspace,
    /// Built-in editor default
    Default,
}

impl Scope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Workspace => "workspace",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every layer's value for one key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inspection {
    pub user: Option<Value>,
    pub workspace: Option<Value>,
    pub default: Option<Value>,
}

/// A value together with the scope it was resolved from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub scope: Scope,
    pub value: &'a Value,
}

impl Inspection {
    /// Effective value: user, then workspace, then default
    #[must_use]
    pub fn resolve(&self) -> Option<Resolved<'_>> {
        if let Some(value) = &self.user {
            Some(Resolved {
                scope: Scope::User,
                value,
            })
        } else if let Some(value) = &self.workspace {
            Some(Resolved {
                scope: Scope::Workspace,
                value,
            })
        } else {
            self.default.as_ref().map(|value| Resolved {
                scope: Scope::Default,
                value,
            })
        }
    }

    /// Explicit override only (user wins over workspace); defaults never count
    #[must_use]
    pub fn override_value(&self) -> Option<Resolved<'_>> {
        self.resolve().filter(|r| r.scope != Scope::Default)
    }

    /// Whether nothing is known about the key at any layer
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.user.is_none() && self.workspace.is_none() && self.default.is_none()
    }
}

/// The editor's configuration store
pub trait ConfigStore {
    /// Read every layer of a key.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigRead` if the store cannot be read.
    fn inspect(&self, key: &str) -> Result<Inspection>;

    /// Write a value at the given scope.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigWrite` if the value cannot be stored.
    fn update(&mut self, key: &str, value: &Value, scope: Scope) -> Result<()>;

    /// Effective value of a key, owned
    ///
    /// # Errors
    ///
    /// Propagates read failures from [`ConfigStore::inspect`].
    fn effective(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inspect(key)?.resolve().map(|r| r.value.clone()))
    }
}
