//! Configuration store backed by the editor's `settings.json` files

use super::{ConfigStore, Inspection, Scope};
use crate::error::{Error, Result};
use crate::storage::{JsonStorage, StorageBackend};

use log::debug;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Reads and writes the editor's flat `settings.json` files.
///
/// Keys are stored flat (`"editor.fontSize": 12`), the way the editor keeps
/// them. Every call goes back to disk, so edits made by the editor between
/// two calls are observed.
#[derive(Debug, Clone)]
pub struct SettingsFileStore<S: StorageBackend = JsonStorage> {
    user_path: PathBuf,
    workspace_path: Option<PathBuf>,
    defaults: Map<String, Value>,
    storage: S,
}

impl SettingsFileStore<JsonStorage> {
    /// Create a store over a user settings file.
    ///
    /// The file does not need to exist yet; it is created on first write.
    pub fn new(user_path: impl Into<PathBuf>) -> Self {
        Self::with_storage(user_path, JsonStorage::jsonc())
    }
}

impl<S: StorageBackend> SettingsFileStore<S> {
    /// Create a store with a custom storage backend
    pub fn with_storage(user_path: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            user_path: user_path.into(),
            workspace_path: None,
            defaults: Map::new(),
            storage,
        }
    }

    /// Also consult a workspace settings file (e.g. `.vscode/settings.json`)
    #[must_use]
    pub fn with_workspace(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_path = Some(path.into());
        self
    }

    /// Known editor defaults, reported in the default layer
    #[must_use]
    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn user_path(&self) -> &Path {
        &self.user_path
    }

    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace_path.as_deref()
    }

    fn read_layer(&self, path: &Path) -> Result<Map<String, Value>> {
        match self.storage.read_optional::<Value>(path)? {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(Error::Parse {
                path: path.to_path_buf(),
                reason: "settings file must contain a JSON object".into(),
            }),
        }
    }

    fn scope_path(&self, scope: Scope) -> Option<&Path> {
        match scope {
            Scope::User => Some(&self.user_path),
            Scope::Workspace => self.workspace_path.as_deref(),
            Scope::Default => None,
        }
    }
}

impl<S: StorageBackend> ConfigStore for SettingsFileStore<S> {
    fn inspect(&self, key: &str) -> Result<Inspection> {
        let read_error = |e: Error| Error::ConfigRead {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let user = self.read_layer(&self.user_path).map_err(read_error)?;
        let workspace = match &self.workspace_path {
            Some(path) => self.read_layer(path).map_err(read_error)?,
            None => Map::new(),
        };

        Ok(Inspection {
            user: user.get(key).cloned(),
            workspace: workspace.get(key).cloned(),
            default: self.defaults.get(key).cloned(),
        })
    }

    fn update(&mut self, key: &str, value: &Value, scope: Scope) -> Result<()> {
        let write_error = |reason: String| Error::ConfigWrite {
            key: key.to_string(),
            reason,
        };

        let path = self
            .scope_path(scope)
            .ok_or_else(|| write_error(format!("no writable {scope} settings file")))?
            .to_path_buf();

        let mut layer = self.read_layer(&path).map_err(|e| write_error(e.to_string()))?;
        layer.insert(key.to_string(), value.clone());
        self.storage
            .write(&path, &Value::Object(layer))
            .map_err(|e| write_error(e.to_string()))?;

        debug!("Wrote {key} to {}", path.display());
        Ok(())
    }
}
