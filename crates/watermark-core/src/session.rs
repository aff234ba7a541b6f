//! Preview and save lifecycle for an interactive front end.
//!
//! A session holds the current base image and the most recent render. Each
//! call to [`WatermarkSession::preview`] replaces the previous render, and
//! [`WatermarkSession::save`] exports whatever was rendered last.

use std::path::Path;

use image::RgbaImage;
use tracing::info;

use crate::apply_watermark;
use crate::config::WatermarkConfig;
use crate::decode::{generate_preview, load_image};
use crate::encode::{flatten_and_encode, ExportOptions};
use crate::error::WatermarkError;
use crate::font::FontResolver;

#[derive(Debug, Default)]
pub struct WatermarkSession {
    fonts: FontResolver,
    base: Option<RgbaImage>,
    output: Option<RgbaImage>,
}

impl WatermarkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session using a custom font resolver.
    pub fn with_fonts(fonts: FontResolver) -> Self {
        Self {
            fonts,
            base: None,
            output: None,
        }
    }

    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// Load the base image from disk. Clears any previous render.
    pub fn load_base(&mut self, path: impl AsRef<Path>) -> Result<(), WatermarkError> {
        let path = path.as_ref();
        let image = load_image(path).map_err(|source| WatermarkError::BaseLoad {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), width = image.width(), height = image.height(), "Loaded base image");
        self.set_base(image);
        Ok(())
    }

    /// Use an already decoded base image. Clears any previous render.
    pub fn set_base(&mut self, image: RgbaImage) {
        self.base = Some(image);
        self.output = None;
    }

    pub fn base(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }

    /// The most recent render, if any.
    pub fn output(&self) -> Option<&RgbaImage> {
        self.output.as_ref()
    }

    /// Render `config` over the base and keep the result.
    pub fn preview(&mut self, config: &WatermarkConfig) -> Result<&RgbaImage, WatermarkError> {
        let base = self
            .base
            .as_ref()
            .ok_or(WatermarkError::MissingInput("no base image loaded"))?;

        let rendered = apply_watermark(base, config, &self.fonts)?;
        Ok(self.output.insert(rendered))
    }

    /// Thumbnail of the most recent render that fits a `max_edge` box.
    pub fn preview_thumbnail(&self, max_edge: u32) -> Result<RgbaImage, WatermarkError> {
        let output = self
            .output
            .as_ref()
            .ok_or(WatermarkError::MissingInput("nothing rendered yet"))?;
        Ok(generate_preview(output, max_edge))
    }

    /// Export the most recent render to `path`.
    pub fn save(&self, path: impl AsRef<Path>, options: &ExportOptions) -> Result<(), WatermarkError> {
        let output = self
            .output
            .as_ref()
            .ok_or(WatermarkError::MissingInput("nothing rendered yet"))?;

        let path = path.as_ref();
        flatten_and_encode(output, path, options)?;
        info!(path = %path.display(), "Saved watermarked image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::LanguageTable;
    use crate::position::Anchor;
    use image::{ImageFormat, Rgba};

    fn session() -> WatermarkSession {
        WatermarkSession::with_fonts(FontResolver::with_parts(
            Box::new(LanguageTable::default()),
            vec![],
        ))
    }

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_preview_without_base() {
        let mut session = session();
        let result = session.preview(&WatermarkConfig::default());
        assert!(matches!(result, Err(WatermarkError::MissingInput(_))));
    }

    #[test]
    fn test_save_without_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut session = session();
        session.set_base(white(50, 50));

        let result = session.save(&path, &ExportOptions::default());
        assert!(matches!(result, Err(WatermarkError::MissingInput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_thumbnail_without_preview() {
        let session = session();
        assert!(matches!(
            session.preview_thumbnail(500),
            Err(WatermarkError::MissingInput(_))
        ));
    }

    #[test]
    fn test_preview_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut session = session();
        session.set_base(white(600, 400));
        let output = session.preview(&WatermarkConfig::text("Sample")).unwrap();
        assert_eq!(output.dimensions(), (600, 400));

        session.save(&path, &ExportOptions::default()).unwrap();
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (600, 400));
    }

    #[test]
    fn test_preview_replaces_previous_output() {
        let mut session = session();
        session.set_base(white(300, 300));

        let first = session
            .preview(&WatermarkConfig {
                position: Anchor::TopLeft,
                ..WatermarkConfig::text("One")
            })
            .unwrap()
            .clone();
        let second = session
            .preview(&WatermarkConfig {
                position: Anchor::BottomRight,
                ..WatermarkConfig::text("Two")
            })
            .unwrap()
            .clone();

        assert_ne!(first, second);
        assert_eq!(session.output(), Some(&second));
    }

    #[test]
    fn test_new_base_clears_output() {
        let mut session = session();
        session.set_base(white(100, 100));
        session.preview(&WatermarkConfig::default()).unwrap();
        assert!(session.output().is_some());

        session.set_base(white(10, 10));
        assert!(session.output().is_none());
    }

    #[test]
    fn test_preview_thumbnail_fits_box() {
        let mut session = session();
        session.set_base(white(1200, 800));
        session.preview(&WatermarkConfig::default()).unwrap();

        let thumb = session.preview_thumbnail(500).unwrap();
        assert_eq!(thumb.dimensions(), (500, 333));
    }

    #[test]
    fn test_failed_overlay_keeps_previous_output() {
        let mut session = session();
        session.set_base(white(100, 100));
        session.preview(&WatermarkConfig::default()).unwrap();
        let before = session.output().cloned();

        let result = session.preview(&WatermarkConfig::image("/definitely/not/here.png"));
        assert!(matches!(result, Err(WatermarkError::OverlayLoad { .. })));
        assert_eq!(session.output().cloned(), before);
    }

    #[test]
    fn test_load_base_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        white(32, 16).save_with_format(&path, ImageFormat::Png).unwrap();

        let mut session = session();
        session.load_base(&path).unwrap();
        assert_eq!(session.base().map(|b| b.dimensions()), Some((32, 16)));
    }

    #[test]
    fn test_load_base_failure() {
        let mut session = session();
        let result = session.load_base("/definitely/not/here.jpg");
        assert!(matches!(result, Err(WatermarkError::BaseLoad { .. })));
        assert!(session.base().is_none());
    }
}
