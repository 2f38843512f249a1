//! Applying the profile after asking the user

use super::fonts::{font_message, install};
use super::{APPLY_NEOVIM_KEY, Collaborators, confirmed};
use crate::apply::{ApplyResult, ProfileApplier, ThemeApplyResult, ThemeOutcome};
use crate::backup::{BackupSnapshot, BackupStore};
use crate::config::ZenforgeConfig;
use crate::error::Result;
use crate::extensions::{ExtensionProvisioner, ExtensionState, InstallationStatus};
use crate::fonts::FontOutcome;
use crate::profile::{PreferenceSet, extract_theme_keys, filter_excluding_optional_group};
use crate::prompt::Notice;

use log::{info, warn};
use serde_json::Value;

/// Where a run is, or where it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    AwaitingConsent,
    Declined,
    Applying,
    Applied,
    AppliedWithWarnings,
    Failed,
}

impl RunState {
    /// Whether a run can end in this state
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Declined | Self::Applied | Self::AppliedWithWarnings | Self::Failed
        )
    }
}

/// Everything that happened during one run
#[derive(Debug)]
pub struct RunReport {
    /// Visited states, starting at `Idle`
    pub transitions: Vec<RunState>,
    pub backup: Option<Result<BackupSnapshot>>,
    pub apply: Option<ApplyResult>,
    pub extensions: Option<InstallationStatus>,
    pub themes: Option<ThemeApplyResult>,
    pub fonts: Option<Result<FontOutcome>>,
    /// Warnings and errors shown to the user
    pub warnings: Vec<String>,
}

impl RunReport {
    fn new() -> Self {
        Self {
            transitions: vec![RunState::Idle],
            backup: None,
            apply: None,
            extensions: None,
            themes: None,
            fonts: None,
            warnings: Vec::new(),
        }
    }

    /// Final state of the run
    #[must_use]
    pub fn state(&self) -> RunState {
        self.transitions.last().copied().unwrap_or(RunState::Idle)
    }

    fn enter(&mut self, state: RunState) {
        info!("Run state: {:?} -> {state:?}", self.state());
        self.transitions.push(state);
    }
}

/// Top-level apply workflow.
///
/// Every call to [`ConsentController::run`] asks again; nothing is
/// remembered between runs.
pub struct ConsentController<'a> {
    host: Collaborators<'a>,
    config: &'a ZenforgeConfig,
}

impl<'a> ConsentController<'a> {
    pub fn new(host: Collaborators<'a>, config: &'a ZenforgeConfig) -> Self {
        Self { host, config }
    }

    /// Ask for consent, then back up, apply, provision extensions, apply the
    /// themes and install fonts.
    ///
    /// Only an unreadable configuration store stops the run early. Every
    /// other failure is reported and the remaining steps still run.
    pub fn run(&mut self, profile: &PreferenceSet) -> RunReport {
        let config = self.config;
        let mut report = RunReport::new();
        report.enter(RunState::AwaitingConsent);

        let question = format!(
            "Apply the '{}' editor profile? Your current values for the {} affected settings are backed up first.",
            profile.name(),
            profile.len()
        );
        if !confirmed(&mut *self.host.prompt, &question) {
            report.enter(RunState::Declined);
            return report;
        }
        report.enter(RunState::Applying);

        // a. backup over every key the profile could touch
        let backup =
            BackupStore::new(&mut *self.host.state).save(&*self.host.store, profile.keys());
        let fatal = match &backup {
            Err(e) if e.is_fatal() => Some(format!(
                "Your current settings could not be read, nothing was changed: {e}"
            )),
            Err(e) => {
                self.warn(&mut report, format!("Settings backup could not be saved: {e}"));
                None
            }
            Ok(_) => None,
        };
        report.backup = Some(backup);
        if let Some(message) = fatal {
            self.host.prompt.notify(Notice::Error, &message);
            report.warnings.push(message);
            report.enter(RunState::Failed);
            return report;
        }

        // b. bulk write
        let include_optional = self.include_optional_group();
        let filtered = filter_excluding_optional_group(profile, include_optional);
        let (settings, theme_keys) = extract_theme_keys(&filtered);
        let applied = ProfileApplier::new(&mut *self.host.store).apply(&settings);
        let nothing_written = match &applied {
            ApplyResult::Applied { .. } => {
                self.host.prompt.notify(Notice::Info, "Custom settings applied!");
                false
            }
            ApplyResult::Failed { written, key, error } => {
                self.warn(
                    &mut report,
                    format!(
                        "Applying settings stopped at '{key}' after {written} setting(s): {error}"
                    ),
                );
                *written == 0
            }
        };
        report.apply = Some(applied);

        // c. companion extensions
        let companions = &config.companions;
        let status = ExtensionProvisioner::new(&mut *self.host.registry).ensure(companions.ids());
        if status.all_present() {
            if status.iter().any(|(_, state)| *state == ExtensionState::Installed) {
                self.host.prompt.notify(Notice::Info, "Required extensions installed!");
            }
        } else {
            let failed: Vec<&str> = status.failures().map(|(id, _)| id).collect();
            self.warn(
                &mut report,
                format!(
                    "Failed to install required extensions ({}). Please install them manually.",
                    failed.join(", ")
                ),
            );
        }

        // d. themes, gated on (c)
        let themes = ProfileApplier::new(&mut *self.host.store)
            .apply_theme_if_provisioned(&theme_keys, companions, &status);
        for outcome in [&themes.color, &themes.icon] {
            match outcome {
                ThemeOutcome::Skipped { extension } => self.warn(
                    &mut report,
                    format!("Theme not applied because {extension} is not installed."),
                ),
                ThemeOutcome::Failed(e) => {
                    self.warn(&mut report, format!("Theme not applied: {e}"));
                }
                ThemeOutcome::Applied | ThemeOutcome::NotInProfile => {}
            }
        }
        report.extensions = Some(status);
        report.themes = Some(themes);

        // e. fonts
        let fonts = install(&mut *self.host.fs, &config.fonts_dir, config.font_destination());
        match font_message(&fonts) {
            (Notice::Info, message) => self.host.prompt.notify(Notice::Info, &message),
            (_, message) => self.warn(&mut report, message),
        }
        report.fonts = Some(fonts);

        let terminal = if nothing_written {
            RunState::Failed
        } else if report.warnings.is_empty() {
            RunState::Applied
        } else {
            RunState::AppliedWithWarnings
        };
        report.enter(terminal);
        report
    }

    /// The Neovim / which-key flag as the editor resolves it, falling back to
    /// the configured default when it is unset or not a boolean.
    fn include_optional_group(&self) -> bool {
        let fallback = self.config.apply_neovim_settings;
        match self.host.store.effective(APPLY_NEOVIM_KEY) {
            Ok(Some(Value::Bool(apply))) => apply,
            Ok(_) => fallback,
            Err(e) => {
                warn!("Could not read {APPLY_NEOVIM_KEY}, using {fallback}: {e}");
                fallback
            }
        }
    }

    fn warn(&mut self, report: &mut RunReport, message: String) {
        self.host.prompt.notify(Notice::Warning, &message);
        report.warnings.push(message);
    }
}
