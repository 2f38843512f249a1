//! Standalone font installation

use crate::error::{Error, Result};
use crate::fonts::{Filesystem, FontInstaller, FontOutcome};
use crate::prompt::{Notice, Prompt};

use std::path::{Path, PathBuf};

/// Installs the bundled fonts and tells the user how it went
pub struct FontController<'a> {
    fs: &'a mut dyn Filesystem,
    prompt: &'a mut dyn Prompt,
}

impl<'a> FontController<'a> {
    pub fn new(fs: &'a mut dyn Filesystem, prompt: &'a mut dyn Prompt) -> Self {
        Self { fs, prompt }
    }

    /// Copy fonts from `source` into `destination`.
    ///
    /// `destination` is taken as a `Result` so a platform directory that
    /// could not be resolved is reported like any other font failure.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceMissing` if `source` does not exist, or the
    /// error that prevented installation from starting.
    pub fn run(&mut self, source: &Path, destination: Result<PathBuf>) -> Result<FontOutcome> {
        let result = install(&mut *self.fs, source, destination);
        let (notice, message) = font_message(&result);
        self.prompt.notify(notice, &message);
        result
    }
}

pub(super) fn install(
    fs: &mut dyn Filesystem,
    source: &Path,
    destination: Result<PathBuf>,
) -> Result<FontOutcome> {
    // A missing source wins over an unresolvable destination
    if !fs.exists(source) {
        return Err(Error::SourceMissing(source.to_path_buf()));
    }
    FontInstaller::new(fs).install(source, &destination?)
}

/// Message describing a font installation result
pub(super) fn font_message(result: &Result<FontOutcome>) -> (Notice, String) {
    match result {
        Ok(FontOutcome::Installed { failed, .. }) if failed.is_empty() => {
            (Notice::Info, "Fonts installed successfully.".to_string())
        }
        Ok(FontOutcome::Installed { copied, failed }) => {
            let reasons: Vec<String> = failed.iter().map(ToString::to_string).collect();
            (
                Notice::Warning,
                format!(
                    "Installed {} font(s), {} could not be copied: {}",
                    copied.len(),
                    failed.len(),
                    reasons.join("; ")
                ),
            )
        }
        Ok(FontOutcome::NoFonts) => (
            Notice::Warning,
            "No font files (.ttf or .otf) were found to install.".to_string(),
        ),
        Err(Error::SourceMissing(path)) => (
            Notice::Error,
            format!(
                "Font source directory '{}' does not exist. Ensure the \"fonts\" folder is available.",
                path.display()
            ),
        ),
        Err(e) => (Notice::Error, format!("Failed to install fonts: {e}")),
    }
}
