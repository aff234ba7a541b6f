//! Watermark rendering WASM bindings.
//!
//! Configs cross the boundary as plain objects with camelCase keys:
//!
//! ```typescript
//! import { apply_watermark, default_config } from '@watermark/wasm';
//!
//! const config = { ...default_config(), text: '© 2024', position: 'center', angle: 30 };
//! const output = apply_watermark(image, config);
//!
//! // Non-Latin scripts need a font; pass the file for the selected language
//! const latha = new Uint8Array(await (await fetch('/fonts/Latha.ttf')).arrayBuffer());
//! const tamil = apply_watermark(image, { ...config, language: 'Tamil', text: sample_text('Tamil') }, undefined, latha);
//!
//! // Image mode: pass the overlay file's bytes
//! const logo = new Uint8Array(await logoFile.arrayBuffer());
//! const branded = apply_watermark(image, { ...config, kind: 'image' }, logo);
//! ```

use crate::types::JsImage;
use watermark_core::config::{WatermarkConfig, WatermarkKind};
use watermark_core::decode::decode_image;
use watermark_core::font::{FontCatalog, FontResolver, LanguageTable, ResolvedFont};
use watermark_core::render::{composite_image_overlay, render_text, render_text_with_font};
use wasm_bindgen::prelude::*;

fn apply(
    image: &JsImage,
    config: &WatermarkConfig,
    overlay: Option<&[u8]>,
    font: Option<&[u8]>,
) -> Result<JsImage, String> {
    let base = image.try_to_rgba()?;

    let output = match config.kind {
        WatermarkKind::Text => match font {
            Some(bytes) => {
                let font = ResolvedFont::from_bytes(bytes.to_vec())
                    .map_err(|e| format!("Failed to load font: {}", e))?;
                render_text_with_font(&base, config, &font)
            }
            // Browser builds cannot probe font directories, so this renders
            // with the bitmap fallback unless the host filesystem is reachable
            None => render_text(&base, config, &FontResolver::new()),
        },
        WatermarkKind::Image => match overlay {
            Some(bytes) => {
                let overlay =
                    decode_image(bytes).map_err(|e| format!("Failed to load overlay image: {}", e))?;
                composite_image_overlay(&base, &overlay, config)
            }
            None => base,
        },
    };

    Ok(JsImage::from_rgba(output))
}

/// Render a watermark over `image`.
///
/// # Arguments
///
/// * `image` - The base image
/// * `config` - A watermark config object; missing keys take their defaults
/// * `overlay` - Encoded overlay image bytes, used in image mode only
/// * `font` - TrueType/OpenType font bytes, used in text mode only; without
///   them the built-in bitmap font is used
///
/// # Errors
///
/// Returns an error if the config is malformed (for example an invalid
/// colour), the image buffer is inconsistent, or the overlay or font cannot be
/// parsed.
#[wasm_bindgen]
pub fn apply_watermark(
    image: &JsImage,
    config: JsValue,
    overlay: Option<Vec<u8>>,
    font: Option<Vec<u8>>,
) -> Result<JsImage, JsValue> {
    let config: WatermarkConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid watermark config: {}", e)))?;

    apply(image, &config, overlay.as_deref(), font.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// The config the UI starts with.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&WatermarkConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Greeting used to prefill the text field when `language` is selected.
#[wasm_bindgen]
pub fn sample_text(language: &str) -> Option<String> {
    LanguageTable::default()
        .sample_text(language)
        .map(str::to_string)
}

/// Languages offered in the language picker.
#[wasm_bindgen]
pub fn languages() -> Vec<String> {
    LanguageTable::default()
        .languages()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use watermark_core::position::Anchor;

    fn white(width: u32, height: u32) -> JsImage {
        JsImage::from_rgba(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }

    const DEJAVU_MONO: &[u8] =
        include_bytes!("../../watermark-core/src/render/fonts/DejaVuSansMono.ttf");

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_sample_text() {
        assert_eq!(sample_text("English").as_deref(), Some("Hello World"));
        assert_eq!(sample_text("tamil").as_deref(), Some("வணக்கம்"));
        assert_eq!(sample_text("Telugu").as_deref(), Some("నమస్తే"));
        assert_eq!(sample_text("Klingon"), None);
    }

    #[test]
    fn test_languages() {
        assert_eq!(languages(), vec!["English", "Tamil", "Telugu"]);
    }

    #[test]
    fn test_text_mode() {
        let base = white(300, 200);
        let out = apply(&base, &WatermarkConfig::text("Mark"), None, None).unwrap();
        assert_eq!((out.width(), out.height()), (300, 200));
        assert_ne!(out.pixels(), base.pixels());
    }

    #[test]
    fn test_text_mode_with_font_bytes() {
        let base = white(600, 400);
        let config = WatermarkConfig {
            text: "Mark".to_string(),
            text_opacity: 255,
            position: Anchor::TopLeft,
            ..WatermarkConfig::default()
        };

        let out = apply(&base, &config, None, Some(DEJAVU_MONO)).unwrap().to_rgba().unwrap();

        let inked = out.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count();
        // 40px outline glyphs cover more than four whole 8x8 cells could
        assert!(inked > 4 * 64, "only {} pixels inked", inked);
    }

    #[test]
    fn test_text_mode_bad_font() {
        let err = apply(&white(40, 40), &WatermarkConfig::text("Mark"), None, Some(b"garbage"))
            .unwrap_err();
        assert!(err.starts_with("Failed to load font"));
    }

    #[test]
    fn test_image_mode_with_overlay_bytes() {
        let base = white(800, 600);
        let logo = png(&RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let config = WatermarkConfig {
            kind: WatermarkKind::Image,
            position: Anchor::Center,
            overlay_opacity: 255,
            ..WatermarkConfig::default()
        };

        let out = apply(&base, &config, Some(&logo), None).unwrap();
        let out = out.to_rgba().unwrap();
        // 200x150 at (300, 225)
        assert_eq!(out.get_pixel(300, 225).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(299, 225).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_image_mode_without_overlay_is_noop() {
        let base = white(40, 40);
        let config = WatermarkConfig {
            kind: WatermarkKind::Image,
            ..WatermarkConfig::default()
        };
        let out = apply(&base, &config, None, None).unwrap();
        assert_eq!(out.pixels(), base.pixels());
    }

    #[test]
    fn test_image_mode_bad_overlay() {
        let config = WatermarkConfig {
            kind: WatermarkKind::Image,
            ..WatermarkConfig::default()
        };
        let err = apply(&white(40, 40), &config, Some(b"garbage"), None).unwrap_err();
        assert!(err.starts_with("Failed to load overlay image"));
    }
}
