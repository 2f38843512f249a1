//! In-memory configuration store

use super::{ConfigStore, Inspection, Scope};
use crate::error::{Error, Result};

use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Configuration store kept entirely in memory.
///
/// Useful for previewing a profile, embedding zenforge in a host that owns
/// persistence itself, and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    user: HashMap<String, Value>,
    workspace: HashMap<String, Value>,
    defaults: HashMap<String, Value>,
}

impl MemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user-scope value
    #[must_use]
    pub fn with_user(mut self, key: impl Into<String>, value: Value) -> Self {
        self.user.insert(key.into(), value);
        self
    }

    /// Seed a workspace-scope value
    #[must_use]
    pub fn with_workspace(mut self, key: impl Into<String>, value: Value) -> Self {
        self.workspace.insert(key.into(), value);
        self
    }

    /// Seed a default value
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Value stored at one scope
    pub fn get(&self, key: &str, scope: Scope) -> Option<&Value> {
        self.layer(scope).get(key)
    }

    /// All user-scope values
    pub fn user_values(&self) -> &HashMap<String, Value> {
        &self.user
    }

    fn layer(&self, scope: Scope) -> &HashMap<String, Value> {
        match scope {
            Scope::User => &self.user,
            Scope::Workspace => &self.workspace,
            Scope::Default => &self.defaults,
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn inspect(&self, key: &str) -> Result<Inspection> {
        Ok(Inspection {
            user: self.user.get(key).cloned(),
            workspace: self.workspace.get(key).cloned(),
            default: self.defaults.get(key).cloned(),
        })
    }

    fn update(&mut self, key: &str, value: &Value, scope: Scope) -> Result<()> {
        let layer = match scope {
            Scope::User => &mut self.user,
            Scope::Workspace => &mut self.workspace,
            Scope::Default => {
                return Err(Error::ConfigWrite {
                    key: key.to_string(),
                    reason: "default values are read-only".into(),
                });
            }
        };
        layer.insert(key.to_string(), value.clone());
        debug!("Set {key} at {scope} scope");
        Ok(())
    }
}
