//! Font installation
//!
//! Copies the bundled font files into the per-user font directory of the
//! host platform. Only TrueType and OpenType files are copied.

use crate::error::{self, Error, Result};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Host platform, which decides where user fonts live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// `~/AppData/Local/Microsoft/Windows/Fonts`
    Windows,
    /// `~/Library/Fonts`
    MacOs,
    /// `~/.fonts` (Linux and every other Unix)
    Unix,
}

impl Platform {
    /// Platform this binary was built for
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier as reported by `std::env::consts::OS`
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Unix,
        }
    }

    /// Per-user font directory under `home`
    #[must_use]
    pub fn font_dir(&self, home: &Path) -> PathBuf {
        match self {
            Self::Windows => home
                .join("AppData")
                .join("Local")
                .join("Microsoft")
                .join("Windows")
                .join("Fonts"),
            Self::MacOs => home.join("Library").join("Fonts"),
            Self::Unix => home.join(".fonts"),
        }
    }

    /// Get platform name for display
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Unix => "Unix",
        }
    }
}

/// Font directory of the current user on the current platform.
///
/// # Errors
///
/// Returns `Error::HomeNotFound` if the home directory cannot be determined.
pub fn default_font_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
    let platform = Platform::current();
    let dir = platform.font_dir(&home);
    debug!("{} user font directory: {}", platform.name(), dir.display());
    Ok(dir)
}

/// Whether a file name looks like an installable font.
///
/// The extension check ignores case; AppleDouble `._` files are rejected.
/// Names need not be valid UTF-8.
#[must_use]
pub fn is_installable_font(name: impl AsRef<OsStr>) -> bool {
    let name = name.as_ref();
    if name.as_encoded_bytes().starts_with(b"._") {
        return false;
    }
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
}

// =============================================================================
// Filesystem
// =============================================================================

/// The slice of the host filesystem font installation needs
pub trait Filesystem {
    /// Entry names in `dir`, exactly as the OS reports them.
    ///
    /// # Errors
    ///
    /// Returns `Error::DirectoryRead` if the directory cannot be listed.
    fn list(&self, dir: &Path) -> Result<Vec<OsString>>;

    /// Copy `from` to `to`, replacing an existing file.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileCopy` if the copy fails.
    fn copy(&mut self, from: &Path, to: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns `Error::DirectoryCreate` if a directory cannot be created.
    fn make_dirs(&mut self, path: &Path) -> Result<()>;
}

/// [`Filesystem`] over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn list(&self, dir: &Path) -> Result<Vec<OsString>> {
        error::read_dir_names(dir)
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        error::copy_file(from, to).map(|_| ())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn make_dirs(&mut self, path: &Path) -> Result<()> {
        error::create_dir(path)
    }
}

// =============================================================================
// Installer
// =============================================================================

/// Result of a font installation pass
#[derive(Debug)]
pub enum FontOutcome {
    /// The source directory holds no font files
    NoFonts,

    /// Fonts were copied; `failed` holds one error per file that was not
    Installed {
        copied: Vec<OsString>,
        failed: Vec<Error>,
    },
}

impl FontOutcome {
    /// Whether every font found was copied
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Installed { failed, .. } if failed.is_empty())
    }
}

/// Copies font files from a source directory into a destination directory
pub struct FontInstaller<'a, F: Filesystem + ?Sized> {
    fs: &'a mut F,
}

impl<'a, F: Filesystem + ?Sized> FontInstaller<'a, F> {
    pub fn new(fs: &'a mut F) -> Self {
        Self { fs }
    }

    /// Copy every font in `source` into `destination`.
    ///
    /// Existing files are overwritten. A failing copy is recorded and the
    /// remaining files are still copied.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceMissing` (before anything is created) if
    /// `source` does not exist, or a directory error if `destination`
    /// cannot be created or `source` cannot be listed.
    pub fn install(&mut self, source: &Path, destination: &Path) -> Result<FontOutcome> {
        if !self.fs.exists(source) {
            return Err(Error::SourceMissing(source.to_path_buf()));
        }

        if !self.fs.exists(destination) {
            debug!("Creating font directory {}", destination.display());
            self.fs.make_dirs(destination)?;
        }

        let fonts: Vec<OsString> = self
            .fs
            .list(source)?
            .into_iter()
            .filter(|name| is_installable_font(name))
            .collect();

        if fonts.is_empty() {
            warn!("No font files found in {}", source.display());
            return Ok(FontOutcome::NoFonts);
        }

        let mut copied = Vec::with_capacity(fonts.len());
        let mut failed = Vec::new();
        for name in fonts {
            match self.fs.copy(&source.join(&name), &destination.join(&name)) {
                Ok(()) => {
                    debug!("Copied font {}", name.to_string_lossy());
                    copied.push(name);
                }
                Err(e) => {
                    warn!("Failed to copy font {}: {e}", name.to_string_lossy());
                    failed.push(e);
                }
            }
        }

        info!(
            "🔤 Installed {} font(s) into {} ({} failed)",
            copied.len(),
            destination.display(),
            failed.len()
        );
        Ok(FontOutcome::Installed { copied, failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::tempdir;

    /// In-memory filesystem recording every mutation
    #[derive(Default)]
    struct FakeFs {
        dirs: BTreeSet<PathBuf>,
        files: BTreeMap<PathBuf, Vec<OsString>>,
        copies: Vec<(PathBuf, PathBuf)>,
        unreadable: BTreeSet<OsString>,
        created: Vec<PathBuf>,
    }

    impl FakeFs {
        fn with_source(dir: &str, names: &[&str]) -> Self {
            let mut fs = Self::default();
            fs.dirs.insert(PathBuf::from(dir));
            fs.files
                .insert(PathBuf::from(dir), names.iter().map(OsString::from).collect());
            fs
        }
    }

    impl Filesystem for FakeFs {
        fn list(&self, dir: &Path) -> Result<Vec<OsString>> {
            Ok(self.files.get(dir).cloned().unwrap_or_default())
        }

        fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
            if self.unreadable.contains(from.file_name().unwrap()) {
                return Err(Error::FileCopy {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            self.copies.push((from.to_path_buf(), to.to_path_buf()));
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn make_dirs(&mut self, path: &Path) -> Result<()> {
            self.created.push(path.to_path_buf());
            self.dirs.insert(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_font_filter() {
        let names = ["a.ttf", "b.OTF", "._c.ttf", "d.txt", "e.Ttf"];
        let accepted: Vec<_> = names
            .into_iter()
            .filter(|n| is_installable_font(n))
            .collect();
        assert_eq!(accepted, vec!["a.ttf", "b.OTF", "e.Ttf"]);
    }

    #[test]
    fn test_platform_font_dirs() {
        let home = Path::new("/home/ada");
        assert_eq!(Platform::from_os("linux").font_dir(home), home.join(".fonts"));
        assert_eq!(Platform::from_os("freebsd"), Platform::Unix);
        assert_eq!(
            Platform::from_os("macos").font_dir(home),
            home.join("Library").join("Fonts")
        );
        assert_eq!(
            Platform::from_os("windows").font_dir(home),
            home.join("AppData/Local/Microsoft/Windows/Fonts")
        );
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let mut fs = FakeFs::default();
        let result = FontInstaller::new(&mut fs)
            .install(Path::new("/bundle/fonts"), Path::new("/home/ada/.fonts"));

        assert!(matches!(result, Err(Error::SourceMissing(_))));
        assert!(fs.created.is_empty());
    }

    #[test]
    fn test_installs_only_fonts_and_creates_destination() {
        let mut fs = FakeFs::with_source(
            "/bundle/fonts",
            &["GeistMono-Regular.otf", "LICENSE.txt", "._GeistMono-Bold.otf"],
        );
        let dest = Path::new("/home/ada/.fonts");

        let outcome = FontInstaller::new(&mut fs)
            .install(Path::new("/bundle/fonts"), dest)
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(fs.created, vec![dest.to_path_buf()]);
        assert_eq!(
            fs.copies,
            vec![(
                PathBuf::from("/bundle/fonts/GeistMono-Regular.otf"),
                dest.join("GeistMono-Regular.otf")
            )]
        );
    }

    #[test]
    fn test_no_fonts() {
        let mut fs = FakeFs::with_source("/bundle/fonts", &["README.md"]);
        let outcome = FontInstaller::new(&mut fs)
            .install(Path::new("/bundle/fonts"), Path::new("/home/ada/.fonts"))
            .unwrap();

        assert!(matches!(outcome, FontOutcome::NoFonts));
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_copy_failure_does_not_stop_others() {
        let mut fs = FakeFs::with_source("/bundle/fonts", &["a.ttf", "b.ttf", "c.otf"]);
        fs.unreadable.insert(OsString::from("b.ttf"));

        let outcome = FontInstaller::new(&mut fs)
            .install(Path::new("/bundle/fonts"), Path::new("/home/ada/.fonts"))
            .unwrap();

        match outcome {
            FontOutcome::Installed { copied, failed } => {
                assert_eq!(copied, vec!["a.ttf", "c.otf"]);
                assert_eq!(failed.len(), 1);
                assert!(matches!(failed[0], Error::FileCopy { .. }));
            }
            other => panic!("expected installed, got {other:?}"),
        }
    }

    #[test]
    fn test_std_filesystem_overwrites() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("fonts");
        let dest = dir.path().join("home/.fonts");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("Geist.ttf"), b"new").unwrap();
        std::fs::write(source.join("notes.txt"), b"skip").unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("Geist.ttf"), b"old").unwrap();

        let mut fs = StdFilesystem;
        let outcome = FontInstaller::new(&mut fs).install(&source, &dest).unwrap();

        assert!(outcome.is_complete());
        assert_eq!(std::fs::read(dest.join("Geist.ttf")).unwrap(), b"new");
        assert!(!dest.join("notes.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_font_name_copied_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let source = dir.path().join("fonts");
        let dest = dir.path().join("home/.fonts");
        std::fs::create_dir_all(&source).unwrap();
        let odd = OsStr::from_bytes(b"Geist\xffMono.ttf");
        std::fs::write(source.join(odd), b"odd").unwrap();
        std::fs::write(source.join("ok.ttf"), b"ok").unwrap();

        let outcome = FontInstaller::new(&mut StdFilesystem)
            .install(&source, &dest)
            .unwrap();

        assert!(outcome.is_complete(), "{outcome:?}");
        assert_eq!(std::fs::read(dest.join(odd)).unwrap(), b"odd");
        assert_eq!(std::fs::read(dest.join("ok.ttf")).unwrap(), b"ok");
    }

    #[test]
    fn test_font_filter_on_os_names() {
        assert!(is_installable_font(OsStr::new("Geist.TTF")));
        assert!(!is_installable_font(OsString::from("._Geist.ttf")));
        assert!(!is_installable_font("ttf"));
    }
}
