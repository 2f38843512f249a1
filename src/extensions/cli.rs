//! Extension registry backed by the editor's command-line interface

use super::ExtensionRegistry;
use crate::error::{Error, Result};

use log::debug;
use std::process::{Command, Output};

/// Default editor executable
pub const DEFAULT_EDITOR_COMMAND: &str = "code";

/// Queries and installs extensions through `code --list-extensions` and
/// `code --install-extension`.
///
/// Extension ids are compared case-insensitively, as the marketplace does.
#[derive(Debug, Clone)]
pub struct EditorCli {
    command: String,
}

impl Default for EditorCli {
    fn default() -> Self {
        Self::new(DEFAULT_EDITOR_COMMAND)
    }
}

impl EditorCli {
    /// Use a specific editor executable (e.g. `code-insiders` or `codium`)
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn run(&self, args: &[&str]) -> std::result::Result<Output, String> {
        debug!("Running {} {}", self.command, args.join(" "));

        let output = Command::new(&self.command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("'{}' was not found on PATH", self.command)
            } else {
                format!("failed to run '{}': {e}", self.command)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "'{}' exited with {:?}: {}",
                self.command,
                output.status.code(),
                stderr.trim()
            ));
        }

        Ok(output)
    }
}

impl ExtensionRegistry for EditorCli {
    fn is_present(&self, id: &str) -> Result<bool> {
        let output = self
            .run(&["--list-extensions"])
            .map_err(|reason| Error::ExtensionQuery {
                id: id.to_string(),
                reason,
            })?;

        Ok(listing_contains(&String::from_utf8_lossy(&output.stdout), id))
    }

    fn install(&mut self, id: &str) -> Result<()> {
        self.run(&["--install-extension", id])
            .map(|_| ())
            .map_err(|reason| Error::ExtensionInstall {
                id: id.to_string(),
                reason,
            })
    }
}

/// Whether a `--list-extensions` listing names `id`.
///
/// Lines may carry a `@version` suffix when listed with `--show-versions`.
fn listing_contains(listing: &str, id: &str) -> bool {
    listing
        .lines()
        .map(|line| line.trim().split('@').next().unwrap_or_default())
        .any(|listed| listed.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_matches_case_insensitively() {
        let listing = concat!(
            "Aura-Theme.aura-theme\n",
            "asvetliakov.vscode-neovim@1.18.12\r\n",
            "moxer-icons.moxer-icons\n",
        );

        assert!(listing_contains(listing, "aura-theme.aura-theme"));
        assert!(listing_contains(listing, "asvetliakov.vscode-neovim"));
        assert!(listing_contains(listing, "moxer-icons.moxer-icons"));
        assert!(!listing_contains(listing, "moxer-icons"));
        assert!(!listing_contains("", "aura-theme.aura-theme"));
    }

    #[test]
    fn test_missing_editor_reports_errors() {
        let mut cli = EditorCli::new("zenforge-test-no-such-editor");

        assert!(matches!(
            cli.is_present("aura-theme.aura-theme"),
            Err(Error::ExtensionQuery { .. })
        ));
        match cli.install("aura-theme.aura-theme") {
            Err(Error::ExtensionInstall { reason, .. }) => assert!(reason.contains("not found")),
            other => panic!("expected install error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_command() {
        assert_eq!(EditorCli::default().command(), "code");
    }
}
