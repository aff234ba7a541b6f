//! Watermark Core - Text and image watermark compositing
//!
//! This crate takes a decoded base image plus a [`WatermarkConfig`] and
//! produces a composited RGBA image of the same size. A text mark is drawn
//! with a font chosen by language, rotated, and blended over the base; an
//! image mark is scaled relative to the base, faded, and pasted at an anchor.
//!
//! Rendering is synchronous and pure: inputs are borrowed, outputs are new
//! buffers, and nothing is cached between calls. Disk access is limited to
//! reading fonts and overlay images and writing the final export.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod font;
pub mod position;
pub mod render;
pub mod session;
pub mod transform;

use image::RgbaImage;
use tracing::debug;

pub use config::{ConfigError, Rgb, WatermarkConfig, WatermarkKind};
pub use decode::{decode_image, generate_preview, load_image, DEFAULT_PREVIEW_EDGE};
pub use encode::{encode_image, flatten_and_encode, EncodeError, ExportFormat, ExportOptions};
pub use error::WatermarkError;
pub use font::{FontResolver, ResolvedFont};
pub use position::{resolve_position, Anchor};
pub use render::{composite_image_overlay, render_image_overlay, render_text};
pub use session::WatermarkSession;

/// Render the watermark `config` describes over a copy of `base`.
///
/// Dispatches on [`WatermarkConfig::kind`]. Only image mode can fail, when
/// the overlay file cannot be loaded.
pub fn apply_watermark(
    base: &RgbaImage,
    config: &WatermarkConfig,
    fonts: &FontResolver,
) -> Result<RgbaImage, WatermarkError> {
    debug!(kind = ?config.kind, width = base.width(), height = base.height(), "Applying watermark");
    match config.kind {
        WatermarkKind::Text => Ok(render_text(base, config, fonts)),
        WatermarkKind::Image => render_image_overlay(base, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::LanguageTable;
    use image::Rgba;

    fn bitmap_only() -> FontResolver {
        FontResolver::with_parts(Box::new(LanguageTable::default()), vec![])
    }

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_text_mode_dispatch() {
        let base = white(200, 100);
        let out = apply_watermark(&base, &WatermarkConfig::text("Mark"), &bitmap_only()).unwrap();
        assert_eq!(out.dimensions(), base.dimensions());
        assert_ne!(out, base);
    }

    #[test]
    fn test_text_mode_ignores_overlay_path() {
        let base = white(200, 100);
        let config = WatermarkConfig {
            overlay_image_path: Some("/definitely/not/here.png".into()),
            ..WatermarkConfig::text("Mark")
        };
        assert!(apply_watermark(&base, &config, &bitmap_only()).is_ok());
    }

    #[test]
    fn test_image_mode_without_path_is_noop() {
        let base = white(200, 100);
        let config = WatermarkConfig {
            kind: WatermarkKind::Image,
            ..WatermarkConfig::default()
        };
        assert_eq!(apply_watermark(&base, &config, &bitmap_only()).unwrap(), base);
    }

    #[test]
    fn test_image_mode_load_failure() {
        let base = white(200, 100);
        let config = WatermarkConfig::image("/definitely/not/here.png");
        assert!(matches!(
            apply_watermark(&base, &config, &bitmap_only()),
            Err(WatermarkError::OverlayLoad { .. })
        ));
    }

    #[test]
    fn test_config_from_json_renders() {
        let json = r##"{"kind":"text","text":"Hi","position":"top-left","color":"#f00","textOpacity":255}"##;
        let config: WatermarkConfig = serde_json::from_str(json).unwrap();

        let out = apply_watermark(&white(300, 300), &config, &bitmap_only()).unwrap();
        // First stroke of 'H' at the top-left margin
        assert_eq!(out.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }
}
