//! Expanding rotation of RGBA layers.
//!
//! Quarter turns are exact pixel permutations. Any other angle uses inverse
//! mapping: for each pixel in the output we find the source position that
//! lands there and sample it with bilinear interpolation on premultiplied
//! colour, so transparent surroundings do not darken anti-aliased edges.
//!
//! For rotation by angle θ (counter-clockwise on screen, y pointing down),
//! the inverse transform is:
//! ```text
//! src_x =  dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y =  dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the output pixel centre relative to the output centre.

use image::{imageops, Rgba, RgbaImage};

/// Angles closer than this to a quarter turn take the exact path.
const ANGLE_EPSILON: f64 = 0.001;

/// Compute the canvas needed to hold an image rotated by `angle_degrees`.
///
/// The result is the smallest integer box containing all four rotated
/// corners, so rotating into it never clips content.
///
/// # Example
///
/// ```
/// use watermark_core::transform::compute_rotated_bounds;
///
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
/// // No rotation preserves dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    if width == 0 || height == 0 {
        return (width, height);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    // A small slack keeps float noise from adding a whole pixel.
    let new_w = (w * cos + h * sin - 1e-6).ceil() as u32;
    let new_h = (w * sin + h * cos - 1e-6).ceil() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an RGBA image about its centre, expanding the canvas.
///
/// Positive angles rotate counter-clockwise. Any angle is accepted and
/// interpreted modulo 360. Areas of the expanded canvas not covered by the
/// source are fully transparent.
pub fn rotate_expand(image: &RgbaImage, angle_degrees: f64) -> RgbaImage {
    match quarter_turns(angle_degrees) {
        Some(0) => return image.clone(),
        Some(1) => return imageops::rotate270(image),
        Some(2) => return imageops::rotate180(image),
        Some(_) => return imageops::rotate90(image),
        None => {}
    }

    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Centers of source and destination images
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    RgbaImage::from_fn(dst_w, dst_h, |dst_x, dst_y| {
        let dx = dst_x as f64 + 0.5 - dst_cx;
        let dy = dst_y as f64 + 0.5 - dst_cy;

        // Back to pixel-index space of the source
        let src_x = dx * cos - dy * sin + src_cx - 0.5;
        let src_y = dx * sin + dy * cos + src_cy - 0.5;

        sample_bilinear(image, src_x, src_y)
    })
}

/// Number of counter-clockwise quarter turns if the angle is (close to) a
/// multiple of 90 degrees.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Fetch a pixel as premultiplied [r, g, b, a] in 0..=255, transparent
/// outside the image.
#[inline]
fn premultiplied(image: &RgbaImage, x: i64, y: i64) -> [f64; 4] {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return [0.0; 4];
    }
    let p = image.get_pixel(x as u32, y as u32);
    let a = p[3] as f64;
    let scale = a / 255.0;
    [p[0] as f64 * scale, p[1] as f64 * scale, p[2] as f64 * scale, a]
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance.
pub(crate) fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = (image.width() as f64, image.height() as f64);

    // Entirely outside: no neighbour can contribute
    if x <= -1.0 || x >= w || y <= -1.0 || y >= h {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x0 + 1, y0);
    let p01 = premultiplied(image, x0, y0 + 1);
    let p11 = premultiplied(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f64; 4];
    for (i, v) in acc.iter_mut().enumerate() {
        *v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = acc[3];
    if alpha < 0.5 {
        return Rgba([0, 0, 0, 0]);
    }

    let unpremultiply = |c: f64| (c * 255.0 / alpha).clamp(0.0, 255.0).round() as u8;
    Rgba([
        unpremultiply(acc[0]),
        unpremultiply(acc[1]),
        unpremultiply(acc[2]),
        alpha.clamp(0.0, 255.0).round() as u8,
    ])
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the rotated canvas always holds the original area.
        #[test]
        fn prop_bounds_cover_source(
            width in 1u32..=500,
            height in 1u32..=500,
            angle in -720.0f64..720.0,
        ) {
            let (w, h) = compute_rotated_bounds(width, height, angle);
            prop_assert!(w as u64 * h as u64 >= width as u64 * height as u64);
        }

        /// Property: rotating by θ and -θ needs the same canvas.
        #[test]
        fn prop_bounds_symmetric(
            width in 1u32..=500,
            height in 1u32..=500,
            angle in 0.0f64..360.0,
        ) {
            prop_assert_eq!(
                compute_rotated_bounds(width, height, angle),
                compute_rotated_bounds(width, height, -angle)
            );
        }

        /// Property: four quarter turns give back the original image.
        #[test]
        fn prop_four_quarter_turns_identity(width in 1u32..=12, height in 1u32..=12) {
            let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]));
            let mut rotated = img.clone();
            for _ in 0..4 {
                rotated = rotate_expand(&rotated, 90.0);
            }
            prop_assert_eq!(rotated, img);
        }
    }
}
