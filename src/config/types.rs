//! Runtime configuration for zenforge

use std::path::{Path, PathBuf};

use crate::apply::Companions;
use crate::error::Result;
use crate::extensions::{DEFAULT_EDITOR_COMMAND, EditorCli};
use crate::fonts;
use crate::state::JsonStateFile;
use crate::store::SettingsFileStore;

/// Where zenforge reads and writes, and which defaults it applies
#[derive(Debug, Clone)]
pub struct ZenforgeConfig {
    /// The editor's user `settings.json`
    pub user_settings: PathBuf,

    /// Workspace `settings.json` consulted during backup, if any
    pub workspace_settings: Option<PathBuf>,

    /// File holding the durable state (the settings backup)
    pub state_file: PathBuf,

    /// Directory holding the bundled font files
    pub fonts_dir: PathBuf,

    /// Font destination; the platform's user font directory when `None`
    pub font_destination: Option<PathBuf>,

    /// Editor executable used to manage extensions
    pub editor_command: String,

    /// Extensions providing the profile's themes
    pub companions: Companions,

    /// Apply the Neovim / which-key group when the editor does not say
    pub apply_neovim_settings: bool,
}

impl ZenforgeConfig {
    /// Create a new builder for `ZenforgeConfig`
    ///
    /// # Example
    /// ```rust
    /// use zenforge::ZenforgeConfig;
    ///
    /// let config = ZenforgeConfig::builder()
    ///     .user_settings("~/.config/Code/User/settings.json")
    ///     .editor_command("codium")
    ///     .build();
    /// assert_eq!(config.editor_command, "codium");
    /// ```
    pub fn builder() -> ZenforgeConfigBuilder {
        ZenforgeConfigBuilder::default()
    }

    /// Resolved font destination directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::HomeNotFound` when no override is set and the home
    /// directory cannot be determined.
    pub fn font_destination(&self) -> Result<PathBuf> {
        match &self.font_destination {
            Some(dir) => Ok(dir.clone()),
            None => fonts::default_font_dir(),
        }
    }

    /// Configuration store over the configured settings files
    pub fn settings_store(&self) -> SettingsFileStore {
        let store = SettingsFileStore::new(&self.user_settings);
        match &self.workspace_settings {
            Some(path) => store.with_workspace(path),
            None => store,
        }
    }

    /// Durable state over the configured state file
    pub fn state_slot(&self) -> JsonStateFile {
        JsonStateFile::new(&self.state_file)
    }

    /// Extension registry using the configured editor executable
    pub fn editor_cli(&self) -> EditorCli {
        EditorCli::new(&self.editor_command)
    }
}

impl Default for ZenforgeConfig {
    fn default() -> Self {
        ZenforgeConfigBuilder::default().build()
    }
}

/// Builder for creating `ZenforgeConfig` with a fluent API
#[derive(Debug, Clone)]
pub struct ZenforgeConfigBuilder {
    user_settings: Option<PathBuf>,
    workspace_settings: Option<PathBuf>,
    state_file: Option<PathBuf>,
    fonts_dir: Option<PathBuf>,
    font_destination: Option<PathBuf>,
    editor_command: String,
    companions: Companions,
    apply_neovim_settings: bool,
}

impl Default for ZenforgeConfigBuilder {
    fn default() -> Self {
        Self {
            user_settings: None,
            workspace_settings: None,
            state_file: None,
            fonts_dir: None,
            font_destination: None,
            editor_command: DEFAULT_EDITOR_COMMAND.into(),
            companions: Companions::default(),
            apply_neovim_settings: true,
        }
    }
}

impl ZenforgeConfigBuilder {
    /// Set the user settings file. Supports `~` expansion.
    #[must_use]
    pub fn user_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_settings = Some(expand_home(path.into()));
        self
    }

    /// Set a workspace settings file. Supports `~` expansion.
    #[must_use]
    pub fn workspace_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_settings = Some(expand_home(path.into()));
        self
    }

    /// Set the state file. Supports `~` expansion.
    #[must_use]
    pub fn state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(expand_home(path.into()));
        self
    }

    /// Set the bundled fonts directory. Supports `~` expansion.
    #[must_use]
    pub fn fonts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(expand_home(path.into()));
        self
    }

    /// Install fonts somewhere other than the platform font directory
    #[must_use]
    pub fn font_destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_destination = Some(expand_home(path.into()));
        self
    }

    /// Set the editor executable (default: "code")
    #[must_use]
    pub fn editor_command(mut self, command: impl Into<String>) -> Self {
        self.editor_command = command.into();
        self
    }

    #[must_use]
    pub fn companions(mut self, companions: Companions) -> Self {
        self.companions = companions;
        self
    }

    /// Fallback for the Neovim / which-key group (default: true)
    #[must_use]
    pub fn apply_neovim_settings(mut self, apply: bool) -> Self {
        self.apply_neovim_settings = apply;
        self
    }

    /// Build the `ZenforgeConfig`
    ///
    /// Unset paths default to the editor's user settings under the system
    /// config directory and to a `zenforge` directory under the system data
    /// directory.
    pub fn build(self) -> ZenforgeConfig {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("zenforge"))
            .unwrap_or_else(|| PathBuf::from("."));

        let user_settings = self.user_settings.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join("Code").join("User").join("settings.json"))
                .unwrap_or_else(|| PathBuf::from("settings.json"))
        });

        ZenforgeConfig {
            user_settings,
            workspace_settings: self.workspace_settings,
            state_file: self
                .state_file
                .unwrap_or_else(|| data_dir.join("state.json")),
            fonts_dir: self.fonts_dir.unwrap_or_else(|| data_dir.join("fonts")),
            font_destination: self.font_destination,
            editor_command: self.editor_command,
            companions: self.companions,
            apply_neovim_settings: self.apply_neovim_settings,
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(Path::new(""))),
        None => path,
    }
}
