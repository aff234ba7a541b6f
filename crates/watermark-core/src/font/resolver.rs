//! Font resolution with a guaranteed fallback.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use thiserror::Error;
use tracing::{debug, warn};

use super::catalog::{FontCatalog, LanguageTable};
use super::source::{default_sources, FontSource};

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Reasons a preferred font could not be used.
///
/// These never leave the resolver; they are logged and answered with the
/// bitmap fallback.
#[derive(Debug, Error)]
pub enum FontError {
    /// No source has the file.
    #[error("Font file not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a usable TrueType/OpenType font.
    #[error("Invalid font data in {0}")]
    Parse(PathBuf),

    /// Caller-supplied bytes are not a usable TrueType/OpenType font.
    #[error("Invalid font data")]
    InvalidData,
}

/// A font ready for layout.
pub enum ResolvedFont {
    /// A scalable outline font, with the file it was loaded from when it
    /// came from disk.
    Outline {
        font: FontVec,
        path: Option<PathBuf>,
    },
    /// The built-in 8x8 bitmap font. Its metrics are fixed and it ignores
    /// the requested pixel size.
    Bitmap,
}

impl ResolvedFont {
    /// Parse an outline font handed over in memory, such as a font file the
    /// browser fetched for the selected language.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let font = FontVec::try_from_vec(data).map_err(|_| FontError::InvalidData)?;
        Ok(ResolvedFont::Outline { font, path: None })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedFont::Bitmap)
    }

    /// Path of the loaded font file, `None` for the fallback.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedFont::Outline { path, .. } => path.as_deref(),
            ResolvedFont::Bitmap => None,
        }
    }
}

impl fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedFont::Outline { path, .. } => {
                f.debug_struct("Outline").field("path", path).finish()
            }
            ResolvedFont::Bitmap => f.write_str("Bitmap"),
        }
    }
}

/// Maps a language (or font name) to a loaded font.
///
/// The catalog and the probe order are both injectable so new languages and
/// platforms can be added without touching the renderers.
#[derive(Debug)]
pub struct FontResolver {
    catalog: Box<dyn FontCatalog>,
    sources: Vec<Box<dyn FontSource>>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver {
    /// Default language table and platform probe order.
    pub fn new() -> Self {
        Self {
            catalog: Box::new(LanguageTable::default()),
            sources: default_sources(),
        }
    }

    /// Resolver with an explicit catalog and probe order.
    pub fn with_parts(catalog: Box<dyn FontCatalog>, sources: Vec<Box<dyn FontSource>>) -> Self {
        Self { catalog, sources }
    }

    /// Replace the language catalog.
    pub fn with_catalog(mut self, catalog: impl FontCatalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    /// Append a probe location, tried after the existing ones.
    pub fn with_source(mut self, source: impl FontSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn catalog(&self) -> &dyn FontCatalog {
        self.catalog.as_ref()
    }

    /// The font file name the resolver will look for.
    ///
    /// Known languages map through the catalog. Unknown ids that already
    /// look like a font file are used verbatim; anything else gets the
    /// catalog's default font.
    pub fn font_file_for(&self, language_or_font: &str) -> String {
        if let Some(file) = self.catalog.font_file(language_or_font) {
            return file.to_string();
        }
        if looks_like_font_file(language_or_font) {
            return language_or_font.trim().to_string();
        }
        self.catalog.default_font_file().to_string()
    }

    /// First existing path for `font_file` across the sources.
    pub fn locate(&self, font_file: &str) -> Option<PathBuf> {
        self.sources.iter().find_map(|source| {
            let found = source.locate(font_file);
            if let Some(path) = &found {
                debug!(source = source.label(), path = %path.display(), "Located font");
            }
            found
        })
    }

    /// Resolve a font. Never fails: any problem yields the bitmap fallback.
    pub fn resolve(&self, language_or_font: &str) -> ResolvedFont {
        match self.try_resolve(language_or_font) {
            Ok(font) => font,
            Err(err) => {
                warn!(request = language_or_font, error = %err, "Using bitmap fallback font");
                ResolvedFont::Bitmap
            }
        }
    }

    /// Resolve a font, reporting why the preferred file could not be used.
    pub fn try_resolve(&self, language_or_font: &str) -> Result<ResolvedFont, FontError> {
        let font_file = self.font_file_for(language_or_font);
        let path = self
            .locate(&font_file)
            .ok_or_else(|| FontError::NotFound(font_file.clone()))?;

        let data = std::fs::read(&path).map_err(|source| FontError::Read {
            path: path.clone(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| FontError::Parse(path.clone()))?;

        Ok(ResolvedFont::Outline {
            font,
            path: Some(path),
        })
    }
}

fn looks_like_font_file(name: &str) -> bool {
    Path::new(name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{DirectPath, FontDirectory, LanguageEntry};
    use std::fs;

    /// Resolver that only probes `dir`, so host fonts never leak into tests.
    fn isolated_resolver(dir: &Path) -> FontResolver {
        FontResolver::with_parts(
            Box::new(LanguageTable::default()),
            vec![Box::new(DirectPath), Box::new(FontDirectory::new("test", dir))],
        )
    }

    #[test]
    fn test_font_file_for_known_language() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.font_file_for("Tamil"), "Latha.ttf");
        assert_eq!(resolver.font_file_for("english"), "arial.ttf");
    }

    #[test]
    fn test_font_file_for_direct_font_name() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.font_file_for("DejaVuSans.TTF"), "DejaVuSans.TTF");
        assert_eq!(
            resolver.font_file_for("/opt/fonts/Custom.otf"),
            "/opt/fonts/Custom.otf"
        );
    }

    #[test]
    fn test_font_file_for_garbage_uses_default() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.font_file_for("x$%^&"), "arial.ttf");
        assert_eq!(resolver.font_file_for(""), "arial.ttf");
    }

    #[test]
    fn test_unknown_language_falls_back_to_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = isolated_resolver(dir.path());

        let font = resolver.resolve("Not-A-Language-∆");
        assert!(font.is_fallback());
        assert!(font.path().is_none());
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = isolated_resolver(dir.path());

        let err = resolver.try_resolve("English").unwrap_err();
        assert!(matches!(err, FontError::NotFound(ref f) if f == "arial.ttf"));
    }

    #[test]
    fn test_corrupt_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Latha.ttf"), b"this is not a font").unwrap();
        let resolver = isolated_resolver(dir.path());

        assert!(matches!(
            resolver.try_resolve("Tamil"),
            Err(FontError::Parse(_))
        ));
        assert!(resolver.resolve("Tamil").is_fallback());
    }

    #[test]
    fn test_first_source_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("arial.ttf"), b"one").unwrap();
        fs::write(second.path().join("arial.ttf"), b"two").unwrap();

        let resolver = FontResolver::with_parts(
            Box::new(LanguageTable::default()),
            vec![
                Box::new(FontDirectory::new("first", first.path())),
                Box::new(FontDirectory::new("second", second.path())),
            ],
        );

        assert_eq!(resolver.locate("arial.ttf"), Some(first.path().join("arial.ttf")));
    }

    #[test]
    fn test_with_source_appends_probe() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Extra.ttf"), b"x").unwrap();

        let resolver = FontResolver::with_parts(Box::new(LanguageTable::default()), vec![])
            .with_source(FontDirectory::new("extra", dir.path()));

        assert_eq!(resolver.locate("Extra.ttf"), Some(dir.path().join("Extra.ttf")));
    }

    #[test]
    fn test_custom_catalog() {
        let resolver = FontResolver::new().with_catalog(
            LanguageTable::new("fallback.ttf")
                .with_language(LanguageEntry::new("Hindi", "Mangal.ttf", "नमस्ते")),
        );
        assert_eq!(resolver.font_file_for("Hindi"), "Mangal.ttf");
        assert_eq!(resolver.font_file_for("English"), "fallback.ttf");
        assert_eq!(resolver.catalog().sample_text("Hindi"), Some("नमस्ते"));
    }
}
