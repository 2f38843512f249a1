//! Editor profiles
//!
//! A [`PreferenceSet`] is the immutable, versioned set of configuration
//! values zenforge writes into the editor. Every entry is tagged with its
//! [`PreferenceGroup`] when the set is built, so filtering never has to look
//! at key names again.

use crate::error::{Error, Result};
use crate::storage::{JsonStorage, StorageBackend};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Key holding the editor color theme
pub const COLOR_THEME_KEY: &str = "workbench.colorTheme";

/// Key holding the editor file icon theme
pub const ICON_THEME_KEY: &str = "workbench.iconTheme";

/// Key prefixes that belong to the optional Neovim integration group
pub const OPTIONAL_GROUP_PREFIXES: &[&str] = &["vscode-neovim.", "whichkey."];

/// The profile shipped with zenforge
const BUNDLED_PROFILE: &str = include_str!("../resources/profile.json");

/// Group a preference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceGroup {
    /// Always applied
    Core,
    /// Applied only when the optional integration is enabled
    Optional,
}

impl PreferenceGroup {
    /// Resolve the group of a key from its name
    #[must_use]
    pub fn classify(key: &str) -> Self {
        if OPTIONAL_GROUP_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
        {
            Self::Optional
        } else {
            Self::Core
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Optional => "optional",
        }
    }
}

impl std::fmt::Display for PreferenceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key/value pair of a profile
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceEntry {
    pub key: String,
    pub value: Value,
    pub group: PreferenceGroup,
}

impl PreferenceEntry {
    /// Create an entry, classifying its group from the key
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        let group = PreferenceGroup::classify(&key);
        Self { key, value, group }
    }
}

/// On-disk profile document
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    name: String,
    #[serde(default = "default_version")]
    version: u32,
    settings: Map<String, Value>,
}

fn default_version() -> u32 {
    1
}

/// Immutable, named set of preferences
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSet {
    name: String,
    version: u32,
    entries: Vec<PreferenceEntry>,
}

impl PreferenceSet {
    /// Build a set from entries.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProfile` for an empty name and
    /// `Error::DuplicateKey` if two entries share a key.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        entries: impl IntoIterator<Item = PreferenceEntry>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidProfile("profile name is empty".into()));
        }

        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for entry in entries {
            if !seen.insert(entry.key.clone()) {
                return Err(Error::DuplicateKey(entry.key));
            }
            collected.push(entry);
        }

        Ok(Self {
            name,
            version,
            entries: collected,
        })
    }

    /// Load the profile bundled with zenforge
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProfile` if the bundled resource is malformed.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_PROFILE)
    }

    /// Parse a profile document (`{ "name", "version", "settings" }`).
    ///
    /// Comments and trailing commas are accepted.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProfile` if the document cannot be parsed.
    pub fn from_json(content: &str) -> Result<Self> {
        let doc: ProfileDocument = JsonStorage::jsonc()
            .deserialize(content)
            .map_err(|e| Error::InvalidProfile(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Load a profile document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid profile.
    pub fn from_path(path: &Path) -> Result<Self> {
        let doc: ProfileDocument = JsonStorage::jsonc().read(path)?;
        Self::from_document(doc)
    }

    fn from_document(doc: ProfileDocument) -> Result<Self> {
        let entries = doc
            .settings
            .into_iter()
            .map(|(key, value)| PreferenceEntry::new(key, value));
        Self::new(doc.name, doc.version, entries)
    }

    /// Derive a set with the same identity but different entries
    fn derive(&self, entries: Vec<PreferenceEntry>) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version,
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PreferenceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreferenceEntry> {
        self.entries.iter()
    }

    /// All keys in write order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Number of entries in the given group
    pub fn count_in(&self, group: PreferenceGroup) -> usize {
        self.entries.iter().filter(|e| e.group == group).count()
    }
}

impl<'a> IntoIterator for &'a PreferenceSet {
    type Item = &'a PreferenceEntry;
    type IntoIter = std::slice::Iter<'a, PreferenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Drop the optional group unless it is enabled.
///
/// With `include_optional` set this is the identity.
#[must_use]
pub fn filter_excluding_optional_group(
    set: &PreferenceSet,
    include_optional: bool,
) -> PreferenceSet {
    if include_optional {
        return set.clone();
    }
    set.derive(
        set.iter()
            .filter(|e| e.group != PreferenceGroup::Optional)
            .cloned()
            .collect(),
    )
}

/// Theme entries held back until their extensions are provisioned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeKeys {
    pub color: Option<PreferenceEntry>,
    pub icon: Option<PreferenceEntry>,
}

/// Split the two theme keys off a set.
///
/// Missing theme keys come back as `None`.
#[must_use]
pub fn extract_theme_keys(set: &PreferenceSet) -> (PreferenceSet, ThemeKeys) {
    let mut themes = ThemeKeys::default();
    let mut remainder = Vec::with_capacity(set.len());

    for entry in set {
        match entry.key.as_str() {
            COLOR_THEME_KEY => themes.color = Some(entry.clone()),
            ICON_THEME_KEY => themes.icon = Some(entry.clone()),
            _ => remainder.push(entry.clone()),
        }
    }

    (set.derive(remainder), themes)
}
