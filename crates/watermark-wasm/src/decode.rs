//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a PNG, JPEG, BMP or TIFF file to RGBA
//! - [`generate_preview`] - Shrink an image to fit the preview pane
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, generate_preview } from '@watermark/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = generate_preview(image, 500);
//! console.log(`Preview: ${preview.width}x${preview.height}`);
//! ```

use crate::types::JsImage;
use watermark_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image file from bytes.
///
/// The format is detected from the content. EXIF orientation is applied so
/// camera photos come out upright.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsImage::from_rgba)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to fit a `max_edge` × `max_edge` box, preserving aspect
/// ratio. Images that already fit are returned unchanged.
///
/// # Errors
///
/// Returns an error if the image's pixel buffer does not match its size.
#[wasm_bindgen]
pub fn generate_preview(image: &JsImage, max_edge: u32) -> Result<JsImage, JsValue> {
    let rgba = image.try_to_rgba().map_err(|e| JsValue::from_str(&e))?;
    Ok(JsImage::from_rgba(decode::generate_preview(&rgba, max_edge)))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0x00, 0x01, 0x02]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_generate_preview() {
        let img = JsImage::new(800, 400, vec![0u8; 800 * 400 * 4]);
        let preview = generate_preview(&img, 500).unwrap();
        assert_eq!((preview.width(), preview.height()), (500, 250));
    }

    #[wasm_bindgen_test]
    fn test_generate_preview_bad_buffer() {
        let img = JsImage::new(8, 8, vec![0u8; 10]);
        assert!(generate_preview(&img, 500).is_err());
    }
}
