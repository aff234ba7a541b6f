//! Watermark WASM - WebAssembly bindings for the watermark engine
//!
//! This crate exposes watermark-core to a browser front end, which owns all
//! of the UI and hands the engine a fully resolved config per request.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for RGBA image data
//! - `decode` - Decoding and preview bindings
//! - `render` - Text and image watermark rendering, config defaults
//! - `encode` - PNG and JPEG export
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, apply_watermark, default_config, encode_jpeg } from '@watermark/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const output = apply_watermark(image, { ...default_config(), text: 'Draft' });
//! const jpeg = encode_jpeg(output, 90);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod render;
mod types;

// Re-export public types
pub use decode::{decode_image, generate_preview};
pub use encode::{encode_jpeg, encode_png};
pub use render::{apply_watermark, default_config, languages, sample_text};
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
