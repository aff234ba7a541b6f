//! Font lookup for text watermarks.
//!
//! Resolution runs in three steps:
//! 1. A [`FontCatalog`] maps the language id to a font file name
//! 2. Each [`FontSource`] is probed in order until one has the file
//! 3. The file is parsed with `ab_glyph`
//!
//! Any failure along the way is logged and answered with the built-in 8x8
//! bitmap font, so [`FontResolver::resolve`] always returns something that
//! can be drawn.

mod catalog;
mod resolver;
mod source;

pub use catalog::{FontCatalog, LanguageEntry, LanguageTable};
pub use resolver::{FontError, FontResolver, ResolvedFont};
pub use source::{default_sources, DirectPath, FontDirectory, FontSource};
