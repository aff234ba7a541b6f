//! Image watermark rendering.

use image::imageops::FilterType;
use image::RgbaImage;
use tracing::debug;

use super::composite::{composite_at, scale_alpha};
use crate::config::WatermarkConfig;
use crate::decode::{load_image, resize_exact, resize_window};
use crate::error::WatermarkError;
use crate::position::resolve_position;

/// Overlay size for a base of `base` dimensions at `percent`.
///
/// Each dimension is `floor(base * percent / 100)`; negative percentages
/// count as zero.
pub fn scaled_overlay_size(base: (u32, u32), percent: i32) -> (u32, u32) {
    let percent = percent.max(0) as u64;
    let scale = |edge: u32| u32::try_from(edge as u64 * percent / 100).unwrap_or(u32::MAX);
    (scale(base.0), scale(base.1))
}

/// Paste the overlay image named by `config.overlay_image_path` over a copy
/// of `base`.
///
/// An unset path is a no-op. A path that cannot be loaded is an error and the
/// base is left as it was.
pub fn render_image_overlay(
    base: &RgbaImage,
    config: &WatermarkConfig,
) -> Result<RgbaImage, WatermarkError> {
    let Some(path) = config.overlay_image_path.as_deref() else {
        debug!("No overlay image selected");
        return Ok(base.clone());
    };

    let overlay = load_image(path).map_err(|source| WatermarkError::OverlayLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(composite_image_overlay(base, &overlay, config))
}

/// Scale, fade and paste an already decoded `overlay` over a copy of `base`.
pub fn composite_image_overlay(
    base: &RgbaImage,
    overlay: &RgbaImage,
    config: &WatermarkConfig,
) -> RgbaImage {
    let mut output = base.clone();

    let (width, height) = scaled_overlay_size(base.dimensions(), config.overlay_scale_percent);
    if width == 0 || height == 0 || overlay.width() == 0 || overlay.height() == 0 {
        debug!(
            percent = config.overlay_scale_percent,
            "Overlay scales to nothing"
        );
        return output;
    }

    let (x, y) = resolve_position(config.position, base.dimensions(), (width, height));
    let (bw, bh) = base.dimensions();

    // An overlay larger than the base is only resampled where it is visible
    let (mut scaled, x, y) = if width as u64 * height as u64 > bw as u64 * bh as u64 {
        let Some((wx, wy, ww, wh)) = visible_window((x, y), (width, height), (bw, bh)) else {
            debug!(width, height, x, y, "Overlay lies entirely off the canvas");
            return output;
        };
        let window = resize_window(overlay, (width, height), (wx, wy, ww, wh));
        (window, x.saturating_add_unsigned(wx), y.saturating_add_unsigned(wy))
    } else {
        (resize_exact(overlay, width, height, FilterType::Triangle), x, y)
    };

    if config.overlay_opacity != u8::MAX {
        for pixel in scaled.pixels_mut() {
            pixel[3] = scale_alpha(pixel[3], config.overlay_opacity);
        }
    }

    debug!(width, height, x, y, "Pasting overlay image");

    composite_at(&mut output, &scaled, x, y);
    output
}

/// Part of a `size` layer placed at `origin` that overlaps a `canvas`, as
/// (x, y, width, height) in layer coordinates.
fn visible_window(
    origin: (i32, i32),
    size: (u32, u32),
    canvas: (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    let (x, y) = (origin.0 as i64, origin.1 as i64);
    let x0 = (-x).max(0);
    let y0 = (-y).max(0);
    let x1 = (canvas.0 as i64 - x).min(size.0 as i64);
    let y1 = (canvas.1 as i64 - y).min(size.1 as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}
