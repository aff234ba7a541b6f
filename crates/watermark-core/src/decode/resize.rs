//! Resizing for overlay scaling and preview thumbnails.
//!
//! All functions return new images without modifying the input.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::transform::sample_bilinear;

/// Longest edge of the preview pane.
pub const DEFAULT_PREVIEW_EDGE: u32 = 500;

/// Resize an image to exact dimensions.
///
/// A zero `width` or `height` yields an empty image.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(image, width, height, filter)
}

/// Sample the `window` (x, y, width, height) of `image` as if it had been
/// resized to `scaled` dimensions, without allocating the full result.
///
/// Pixels are bilinearly interpolated with edges clamped, which matches a
/// triangle-filtered upscale. Returns an empty image when the window or the
/// source is empty.
pub fn resize_window(
    image: &RgbaImage,
    scaled: (u32, u32),
    window: (u32, u32, u32, u32),
) -> RgbaImage {
    let (x0, y0, width, height) = window;
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 || scaled.0 == 0 || scaled.1 == 0 {
        return RgbaImage::new(0, 0);
    }

    let fx = src_w as f64 / scaled.0 as f64;
    let fy = src_h as f64 / scaled.1 as f64;
    let (max_x, max_y) = ((src_w - 1) as f64, (src_h - 1) as f64);

    RgbaImage::from_fn(width, height, |x, y| {
        let sx = ((x0 as f64 + x as f64 + 0.5) * fx - 0.5).clamp(0.0, max_x);
        let sy = ((y0 as f64 + y as f64 + 0.5) * fy - 0.5).clamp(0.0, max_y);
        sample_bilinear(image, sx, sy)
    })
}

/// Resize an image to fit within a `max_edge` box while preserving aspect
/// ratio.
///
/// Images that already fit are returned unchanged; this never upscales.
/// A `max_edge` of zero is treated as one.
pub fn resize_to_fit(image: &RgbaImage, max_edge: u32, filter: FilterType) -> RgbaImage {
    let max_edge = max_edge.max(1);
    let (src_width, src_height) = image.dimensions();

    if src_width <= max_edge && src_height <= max_edge {
        return image.clone();
    }

    let (new_width, new_height) = calculate_fit_dimensions(src_width, src_height, max_edge);
    resize_exact(image, new_width, new_height, filter)
}

/// Generate a preview thumbnail that fits a `max_edge` × `max_edge` box.
///
/// Uses bilinear interpolation, a good balance of speed and quality for an
/// on-screen preview.
pub fn generate_preview(image: &RgbaImage, max_edge: u32) -> RgbaImage {
    resize_to_fit(image, max_edge, FilterType::Triangle)
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        // Landscape or square: constrain by width
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        // Portrait: constrain by height
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
