//! Image decoding and resizing.
//!
//! This module provides functionality for:
//! - Decoding base and overlay images of any enabled format to RGBA
//! - Correcting EXIF orientation so camera photos are upright
//! - Resizing for overlay scaling and preview thumbnails
//!
//! # Examples
//!
//! ```ignore
//! use watermark_core::decode::{generate_preview, load_image, DEFAULT_PREVIEW_EDGE};
//!
//! let photo = load_image("photo.jpg").unwrap();
//! let preview = generate_preview(&photo, DEFAULT_PREVIEW_EDGE);
//! println!("Preview {}x{}", preview.width(), preview.height());
//! ```

mod load;
mod orientation;
mod resize;

pub use load::{decode_image, load_image};
pub use orientation::{apply_orientation, read_orientation, Orientation};
pub use resize::{
    generate_preview, resize_exact, resize_to_fit, resize_window, DEFAULT_PREVIEW_EDGE,
};
