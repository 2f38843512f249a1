//! Common test utilities for zenforge integration tests
//!
//! Provides host doubles, a sample profile and a temporary font layout.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use tempfile::TempDir;
use zenforge::{
    ConfigStore, Error, ExtensionRegistry, Inspection, MemoryConfigStore, Notice,
    PreferenceEntry, PreferenceSet, Prompt, Result, Scope, ZenforgeConfig,
};

// =============================================================================
// Configuration store
// =============================================================================

/// Memory store that can refuse chosen reads and writes
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryConfigStore,
    pub unreadable: HashSet<String>,
    pub unwritable: HashSet<String>,
    /// Keys in the order they were written (successful or not)
    pub write_log: Vec<String>,
}

impl FlakyStore {
    pub fn new(inner: MemoryConfigStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn user(&self, key: &str) -> Option<&Value> {
        self.inner.get(key, Scope::User)
    }
}

impl ConfigStore for FlakyStore {
    fn inspect(&self, key: &str) -> Result<Inspection> {
        if self.unreadable.contains(key) {
            return Err(Error::ConfigRead {
                key: key.to_string(),
                reason: "settings store unavailable".into(),
            });
        }
        self.inner.inspect(key)
    }

    fn update(&mut self, key: &str, value: &Value, scope: Scope) -> Result<()> {
        self.write_log.push(key.to_string());
        if self.unwritable.contains(key) {
            return Err(Error::ConfigWrite {
                key: key.to_string(),
                reason: "setting is read-only".into(),
            });
        }
        self.inner.update(key, value, scope)
    }
}

// =============================================================================
// Extension registry
// =============================================================================

#[derive(Default)]
pub struct FakeRegistry {
    pub installed: HashSet<String>,
    pub broken: HashSet<String>,
    pub install_calls: Vec<String>,
}

impl FakeRegistry {
    pub fn with_installed(ids: &[&str]) -> Self {
        Self {
            installed: ids.iter().map(|id| (*id).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ExtensionRegistry for FakeRegistry {
    fn is_present(&self, id: &str) -> Result<bool> {
        Ok(self.installed.contains(id))
    }

    fn install(&mut self, id: &str) -> Result<()> {
        self.install_calls.push(id.to_string());
        if self.broken.contains(id) {
            return Err(Error::ExtensionInstall {
                id: id.to_string(),
                reason: "marketplace unreachable".into(),
            });
        }
        self.installed.insert(id.to_string());
        Ok(())
    }
}

// =============================================================================
// Prompt
// =============================================================================

/// Prompt answering from a script and recording everything shown
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<Option<String>>,
    pub questions: Vec<String>,
    pub notices: Vec<(Notice, String)>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(String::from)).collect(),
            ..Self::default()
        }
    }

    pub fn yes() -> Self {
        Self::answering(&[Some("Yes")])
    }

    pub fn messages(&self, notice: Notice) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(n, _)| *n == notice)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str, _options: &[&str]) -> Result<Option<String>> {
        self.questions.push(message.to_string());
        Ok(self.answers.pop_front().flatten())
    }

    fn notify(&mut self, notice: Notice, message: &str) {
        self.notices.push((notice, message.to_string()));
    }
}

// =============================================================================
// Profile
// =============================================================================

pub const COLOR_EXT: &str = "aura-theme.aura-theme";
pub const ICON_EXT: &str = "moxer-icons.moxer-icons";

/// Three core keys, both theme keys and two optional keys
pub fn sample_profile() -> PreferenceSet {
    PreferenceSet::new(
        "sample",
        1,
        vec![
            PreferenceEntry::new("editor.fontSize", json!(12)),
            PreferenceEntry::new("editor.fontFamily", json!("Geist Mono")),
            PreferenceEntry::new(
                "workbench.colorCustomizations",
                json!({"[Aura Dark]": {"editor.background": "#110f17"}}),
            ),
            PreferenceEntry::new("workbench.colorTheme", json!("Aura Dark")),
            PreferenceEntry::new("workbench.iconTheme", json!("moxer-icons")),
            PreferenceEntry::new("whichkey.delay", json!(0)),
            PreferenceEntry::new(
                "vscode-neovim.neovimExecutablePaths.linux",
                json!("/usr/bin/nvim"),
            ),
        ],
    )
    .expect("sample profile is valid")
}

pub const CORE_KEYS: [&str; 3] = [
    "editor.fontSize",
    "editor.fontFamily",
    "workbench.colorCustomizations",
];

pub const OPTIONAL_KEYS: [&str; 2] = [
    "whichkey.delay",
    "vscode-neovim.neovimExecutablePaths.linux",
];

// =============================================================================
// Test Fixtures
// =============================================================================

/// Route library logs through the test harness; `RUST_LOG=debug` shows them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Temporary directory with a fonts source and an empty font destination
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub config: ZenforgeConfig,
}

impl TestFixture {
    /// Fixture whose font source holds two fonts and a license file
    pub fn new() -> Self {
        Self::with_fonts(&["GeistMono-Regular.otf", "GeistMono-Bold.ttf", "LICENSE.txt"])
    }

    pub fn with_fonts(names: &[&str]) -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let fonts = temp_dir.path().join("bundle/fonts");
        std::fs::create_dir_all(&fonts).expect("Failed to create fonts dir");
        for name in names {
            std::fs::write(fonts.join(name), name.as_bytes()).expect("Failed to write font");
        }

        let config = ZenforgeConfig::builder()
            .user_settings(temp_dir.path().join("User/settings.json"))
            .state_file(temp_dir.path().join("state/state.json"))
            .fonts_dir(fonts)
            .font_destination(temp_dir.path().join("home/.fonts"))
            .build();

        Self { temp_dir, config }
    }

    /// Fixture whose font source directory does not exist
    pub fn without_fonts_dir() -> Self {
        let mut fixture = Self::with_fonts(&[]);
        fixture.config.fonts_dir = fixture.temp_dir.path().join("missing");
        fixture
    }

    pub fn font_destination(&self) -> PathBuf {
        self.temp_dir.path().join("home/.fonts")
    }

    pub fn installed_fonts(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.font_destination())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
