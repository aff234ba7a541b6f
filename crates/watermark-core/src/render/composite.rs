//! Porter-Duff "over" compositing of RGBA layers.

use image::{Rgba, RgbaImage};

/// Blend `fg` over `bg`.
///
/// A fully transparent foreground returns the background unchanged, so an
/// empty layer never perturbs the base through rounding.
#[inline]
pub fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    let fa = fg[3] as u32;
    if fa == 0 {
        return bg;
    }
    if fa == 255 {
        return fg;
    }

    let ba = bg[3] as u32;
    // out_a = fa + ba * (1 - fa), scaled by 255
    let ba_scaled = ba * (255 - fa);
    let out_a_255 = fa * 255 + ba_scaled;
    if out_a_255 == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |f: u8, b: u8| {
        let num = f as u32 * fa * 255 + b as u32 * ba_scaled;
        ((num + out_a_255 / 2) / out_a_255) as u8
    };

    Rgba([
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
        ((out_a_255 + 127) / 255) as u8,
    ])
}

/// Composite `layer` over `base` with the layer's top-left at `(x, y)`.
///
/// Parts of the layer outside the base are clipped; offsets may be negative.
pub fn composite_at(base: &mut RgbaImage, layer: &RgbaImage, x: i32, y: i32) {
    let (bw, bh) = (base.width() as i64, base.height() as i64);
    let (lw, lh) = (layer.width() as i64, layer.height() as i64);
    let (x, y) = (x as i64, y as i64);

    // Visible window in base coordinates
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + lw).min(bw);
    let y1 = (y + lh).min(bh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for by in y0..y1 {
        for bx in x0..x1 {
            let fg = *layer.get_pixel((bx - x) as u32, (by - y) as u32);
            if fg[3] == 0 {
                continue;
            }
            let px = base.get_pixel_mut(bx as u32, by as u32);
            *px = blend_over(*px, fg);
        }
    }
}

/// Multiply an 8-bit alpha by `opacity / 255`, rounded to nearest.
#[inline]
pub fn scale_alpha(alpha: u8, opacity: u8) -> u8 {
    ((alpha as u32 * opacity as u32 + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_foreground_keeps_background() {
        let bg = Rgba([12, 34, 56, 78]);
        assert_eq!(blend_over(bg, Rgba([255, 255, 255, 0])), bg);
    }

    #[test]
    fn test_opaque_foreground_replaces_background() {
        let fg = Rgba([1, 2, 3, 255]);
        assert_eq!(blend_over(Rgba([200, 200, 200, 255]), fg), fg);
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let out = blend_over(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 128]));
        assert_eq!(out[3], 255);
        // 255 * 127 / 255 = 127
        assert_eq!(out[0], 127);
    }

    #[test]
    fn test_over_transparent_background() {
        let fg = Rgba([100, 150, 200, 90]);
        assert_eq!(blend_over(Rgba([0, 0, 0, 0]), fg), fg);
    }

    #[test]
    fn test_scale_alpha_rounding() {
        assert_eq!(scale_alpha(200, 128), 100);
        assert_eq!(scale_alpha(255, 150), 150);
        assert_eq!(scale_alpha(255, 0), 0);
        assert_eq!(scale_alpha(0, 255), 0);
    }

    #[test]
    fn test_composite_clips_negative_offset() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));

        composite_at(&mut base, &layer, -2, -2);

        assert_eq!(base.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(base.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(base.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_composite_clips_far_edge() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));

        composite_at(&mut base, &layer, 3, 3);

        assert_eq!(base.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(base.get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_composite_entirely_off_canvas() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let before = base.clone();
        let layer = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));

        composite_at(&mut base, &layer, 10, -20);
        composite_at(&mut base, &layer, -3, 0);

        assert_eq!(base, before);
    }
}
