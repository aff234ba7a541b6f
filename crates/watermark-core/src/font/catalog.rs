//! Language to font file mapping.

/// Maps a language id to the font file that can render it.
///
/// Implementations are plain lookups; locating and loading the file is the
/// resolver's job.
pub trait FontCatalog: std::fmt::Debug {
    /// Font file name for `language`, if the catalog knows it.
    fn font_file(&self, language: &str) -> Option<&str>;

    /// Font file used for languages the catalog does not know.
    fn default_font_file(&self) -> &str;

    /// A short greeting in `language`, used to prefill the text field.
    fn sample_text(&self, language: &str) -> Option<&str>;

    /// Every language id the catalog knows, in display order.
    fn languages(&self) -> Vec<&str>;
}

/// One row of a [`LanguageTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub language: String,
    pub font_file: String,
    pub sample_text: String,
}

impl LanguageEntry {
    pub fn new(
        language: impl Into<String>,
        font_file: impl Into<String>,
        sample_text: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            font_file: font_file.into(),
            sample_text: sample_text.into(),
        }
    }
}

/// Table-backed [`FontCatalog`]. Language ids match case-insensitively.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: Vec<LanguageEntry>,
    default_font_file: String,
}

impl LanguageTable {
    /// Empty table that maps everything to `default_font_file`.
    pub fn new(default_font_file: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default_font_file: default_font_file.into(),
        }
    }

    /// Add or replace a language.
    pub fn with_language(mut self, entry: LanguageEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Add or replace a language in place.
    pub fn insert(&mut self, entry: LanguageEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.language.eq_ignore_ascii_case(&entry.language))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn entry(&self, language: &str) -> Option<&LanguageEntry> {
        let language = language.trim();
        self.entries
            .iter()
            .find(|e| e.language.eq_ignore_ascii_case(language))
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        LanguageTable::new("arial.ttf")
            .with_language(LanguageEntry::new("English", "arial.ttf", "Hello World"))
            .with_language(LanguageEntry::new("Tamil", "Latha.ttf", "வணக்கம்"))
            .with_language(LanguageEntry::new(
                "Telugu",
                "NotoSansTelugu-Regular.ttf",
                "నమస్తే",
            ))
    }
}

impl FontCatalog for LanguageTable {
    fn font_file(&self, language: &str) -> Option<&str> {
        self.entry(language).map(|e| e.font_file.as_str())
    }

    fn default_font_file(&self) -> &str {
        &self.default_font_file
    }

    fn sample_text(&self, language: &str) -> Option<&str> {
        self.entry(language).map(|e| e.sample_text.as_str())
    }

    fn languages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.language.as_str()).collect()
    }
}
