//! Image encoding WASM bindings.
//!
//! Both encoders flatten transparency over white before encoding, matching
//! what the native exporter writes to disk.
//!
//! # Example
//!
//! ```typescript
//! import { encode_jpeg } from '@watermark/wasm';
//!
//! const jpeg = encode_jpeg(output, 90);
//! const writable = await fileHandle.createWritable();
//! await writable.write(new Blob([jpeg], { type: 'image/jpeg' }));
//! await writable.close();
//! ```

use crate::types::JsImage;
use watermark_core::encode::{self, ExportFormat, ExportOptions};
use wasm_bindgen::prelude::*;

fn encode_as(image: &JsImage, format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>, String> {
    let rgba = image.try_to_rgba()?;
    encode::encode_image(&rgba, format, options).map_err(|e| e.to_string())
}

/// Encode an image to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    encode_as(image, ExportFormat::Png, &ExportOptions::default()).map_err(|e| JsValue::from_str(&e))
}

/// Encode an image to JPEG bytes.
///
/// # Arguments
///
/// * `image` - The image to encode
/// * `quality` - JPEG quality (1-100, recommended: 90); out-of-range values are clamped
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    let options = ExportOptions {
        jpeg_quality: quality,
        ..ExportOptions::default()
    };
    encode_as(image, ExportFormat::Jpeg, &options).map_err(|e| JsValue::from_str(&e))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_jpeg_quality_range() {
        let img = JsImage::new(50, 50, vec![128u8; 50 * 50 * 4]);
        let low = encode_jpeg(&img, 20).unwrap();
        let high = encode_jpeg(&img, 95).unwrap();
        assert_eq!(&low[0..2], &[0xFF, 0xD8]);
        assert_eq!(&high[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_encode_png() {
        let img = JsImage::new(4, 4, vec![0u8; 4 * 4 * 4]);
        assert!(encode_png(&img).is_ok());
    }
}
