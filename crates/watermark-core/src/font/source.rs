//! Places a font file can be found.
//!
//! Each [`FontSource`] is one probe strategy. The resolver walks its sources
//! in order and uses the first one that reports an existing file.

use std::path::{Path, PathBuf};

/// A strategy for turning a font file name into an existing path.
pub trait FontSource: std::fmt::Debug {
    /// Short label for log output.
    fn label(&self) -> &str;

    /// Existing path for `font_file`, or `None` if this source lacks it.
    fn locate(&self, font_file: &str) -> Option<PathBuf>;
}

/// Treats the name itself as a path (absolute or relative to the working
/// directory).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPath;

impl FontSource for DirectPath {
    fn label(&self) -> &str {
        "direct path"
    }

    fn locate(&self, font_file: &str) -> Option<PathBuf> {
        let path = Path::new(font_file);
        path.is_file().then(|| path.to_path_buf())
    }
}

/// Looks for the file directly inside a font directory.
#[derive(Debug, Clone)]
pub struct FontDirectory {
    label: String,
    dir: PathBuf,
}

impl FontDirectory {
    pub fn new(label: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            dir: dir.into(),
        }
    }

    /// The well-known system font directory for the target platform.
    pub fn system() -> Option<Self> {
        system_font_dir().map(|dir| Self::new("system fonts", dir))
    }

    /// The per-user font directory, where the platform defines one.
    pub fn user() -> Option<Self> {
        dirs::font_dir().map(|dir| Self::new("user fonts", dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FontSource for FontDirectory {
    fn label(&self) -> &str {
        &self.label
    }

    fn locate(&self, font_file: &str) -> Option<PathBuf> {
        // Only bare file names are looked up; a path belongs to DirectPath
        let name = Path::new(font_file).file_name()?;
        let candidate = self.dir.join(name);
        candidate.is_file().then_some(candidate)
    }
}

fn system_font_dir() -> Option<&'static str> {
    #[cfg(target_os = "windows")]
    {
        Some("C:\\Windows\\Fonts")
    }
    #[cfg(target_os = "macos")]
    {
        Some("/Library/Fonts")
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Some("/usr/share/fonts")
    }
    #[cfg(not(any(unix, target_os = "windows")))]
    {
        None
    }
}

/// Probe order used by a default resolver: direct path, system directory,
/// then the user directory.
pub fn default_sources() -> Vec<Box<dyn FontSource>> {
    let mut sources: Vec<Box<dyn FontSource>> = vec![Box::new(DirectPath)];
    if let Some(system) = FontDirectory::system() {
        sources.push(Box::new(system));
    }
    if let Some(user) = FontDirectory::user() {
        sources.push(Box::new(user));
    }
    sources
}
