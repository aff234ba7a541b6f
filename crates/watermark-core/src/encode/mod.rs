//! Export of composited images.
//!
//! This module provides functionality for:
//! - Flattening RGBA output over an opaque background
//! - Encoding to PNG, JPEG, BMP or TIFF in memory
//! - Writing the result to disk without leaving partial files behind
//!
//! # Examples
//!
//! ```ignore
//! use watermark_core::encode::{flatten_and_encode, ExportOptions};
//!
//! flatten_and_encode(&output, "watermarked.jpg", &ExportOptions::default()).unwrap();
//! ```

mod export;

pub use export::{
    encode_image, flatten, flatten_and_encode, EncodeError, ExportFormat, ExportOptions,
    DEFAULT_JPEG_QUALITY,
};
