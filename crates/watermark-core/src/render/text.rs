//! Text watermark rendering.
//!
//! The text is laid out once, its ink bounding box is measured, and the box
//! is placed with the position resolver. Glyphs are drawn onto a transparent
//! layer the size of the base, the layer is rotated about its centre with an
//! expanding canvas, and the result is composited over a copy of the base
//! with its top-left corner at the origin.

use ab_glyph::{point, Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::RgbaImage;
use tracing::debug;

use super::composite::composite_at;
use crate::config::WatermarkConfig;
use crate::font::{FontResolver, ResolvedFont};
use crate::position::resolve_position;
use crate::transform::rotate_expand;

/// Edge length of a bitmap fallback glyph cell.
const BITMAP_CELL: i32 = 8;

/// Font pixel size for a base image of the given width.
pub fn font_px_for_width(width: u32) -> f32 {
    match width {
        0..=499 => 20.0,
        500..=999 => 40.0,
        1000..=1999 => 60.0,
        _ => 80.0,
    }
}

/// Tight box around the drawn pixels, in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InkBox {
    min_x: i32,
    min_y: i32,
    width: u32,
    height: u32,
}

/// Text broken into positioned glyphs.
enum TextLayout {
    Outline(Vec<OutlinedGlyph>),
    /// Cell origin and bitmap rows of each glyph.
    Bitmap(Vec<(i32, i32, [u8; 8])>),
}

impl TextLayout {
    fn new(font: &ResolvedFont, px: f32, text: &str) -> Self {
        match font {
            ResolvedFont::Outline { font, .. } => TextLayout::Outline(layout_outline(font, px, text)),
            ResolvedFont::Bitmap => TextLayout::Bitmap(layout_bitmap(text)),
        }
    }

    fn ink_box(&self) -> Option<InkBox> {
        let bounds = match self {
            TextLayout::Outline(glyphs) => glyphs
                .iter()
                .map(|g| {
                    let r = g.px_bounds();
                    (
                        r.min.x.floor() as i32,
                        r.min.y.floor() as i32,
                        r.max.x.ceil() as i32,
                        r.max.y.ceil() as i32,
                    )
                })
                .reduce(union)?,
            // Fixed cells: the box covers every cell, inked or not
            TextLayout::Bitmap(cells) => cells
                .iter()
                .map(|&(x, y, _)| (x, y, x + BITMAP_CELL, y + BITMAP_CELL))
                .reduce(union)?,
        };

        let (min_x, min_y, max_x, max_y) = bounds;
        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(InkBox {
            min_x,
            min_y,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        })
    }

    /// Call `plot(x, y, coverage)` for every covered pixel, in layout
    /// coordinates.
    fn for_each_pixel(&self, mut plot: impl FnMut(i32, i32, f32)) {
        match self {
            TextLayout::Outline(glyphs) => {
                for glyph in glyphs {
                    let bounds = glyph.px_bounds();
                    let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
                    glyph.draw(|x, y, coverage| plot(ox + x as i32, oy + y as i32, coverage));
                }
            }
            TextLayout::Bitmap(cells) => {
                for &(cx, cy, rows) in cells {
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..BITMAP_CELL {
                            if (bits >> col) & 1 == 1 {
                                plot(cx + col, cy + row as i32, 1.0);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn union(a: (i32, i32, i32, i32), b: (i32, i32, i32, i32)) -> (i32, i32, i32, i32) {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

fn layout_outline(font: &FontVec, px: f32, text: &str) -> Vec<OutlinedGlyph> {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let line_height = scaled.height() + scaled.line_gap();

    let mut glyphs = Vec::new();
    let mut baseline = scaled.ascent();

    for line in text.lines() {
        let mut caret = 0.0f32;
        let mut previous = None;

        for c in line.chars() {
            let id = font.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }
        baseline += line_height;
    }

    glyphs
}

fn layout_bitmap(text: &str) -> Vec<(i32, i32, [u8; 8])> {
    let mut cells = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let y = line_no as i32 * BITMAP_CELL;
        for (col, c) in line.chars().enumerate() {
            // Characters outside the basic set render as '?'
            let rows = BASIC_FONTS
                .get(c)
                .or_else(|| BASIC_FONTS.get('?'))
                .unwrap_or([0; 8]);
            cells.push((col as i32 * BITMAP_CELL, y, rows));
        }
    }

    cells
}

/// Size of the ink bounding box of `text`, `None` if nothing would be drawn.
///
/// Outline fonts are measured at `px`; the bitmap fallback always uses 8×8
/// cells.
pub fn measure_text(font: &ResolvedFont, px: f32, text: &str) -> Option<(u32, u32)> {
    TextLayout::new(font, px, text)
        .ink_box()
        .map(|ink| (ink.width, ink.height))
}

/// Render a text watermark over a copy of `base`.
///
/// The font comes from `fonts` keyed by `config.language`. Empty text yields
/// an identical copy of the base.
pub fn render_text(base: &RgbaImage, config: &WatermarkConfig, fonts: &FontResolver) -> RgbaImage {
    if config.text.is_empty() {
        return base.clone();
    }
    render_text_with_font(base, config, &fonts.resolve(&config.language))
}

/// Like [`render_text`], with an already resolved `font`.
pub fn render_text_with_font(
    base: &RgbaImage,
    config: &WatermarkConfig,
    font: &ResolvedFont,
) -> RgbaImage {
    let mut output = base.clone();
    if config.text.is_empty() {
        return output;
    }

    let px = font_px_for_width(base.width());
    let layout = TextLayout::new(font, px, &config.text);

    let Some(ink) = layout.ink_box() else {
        return output;
    };

    let (x, y) = resolve_position(config.position, base.dimensions(), (ink.width, ink.height));
    debug!(
        ?font,
        px,
        width = ink.width,
        height = ink.height,
        x,
        y,
        angle = config.angle,
        "Rendering text watermark"
    );

    // Shift so the ink box's top-left lands on (x, y)
    let dx = x as i64 - ink.min_x as i64;
    let dy = y as i64 - ink.min_y as i64;

    let mut layer = RgbaImage::new(base.width(), base.height());
    let (lw, lh) = (layer.width() as i64, layer.height() as i64);

    layout.for_each_pixel(|gx, gy, coverage| {
        let (lx, ly) = (gx as i64 + dx, gy as i64 + dy);
        if lx < 0 || ly < 0 || lx >= lw || ly >= lh {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * config.text_opacity as f32).round() as u8;
        let pixel = layer.get_pixel_mut(lx as u32, ly as u32);
        // Overlapping glyphs keep the stronger coverage
        if alpha > pixel[3] {
            *pixel = config.color.with_alpha(alpha);
        }
    });

    let rotated = rotate_expand(&layer, config.angle as f64);
    composite_at(&mut output, &rotated, 0, 0);
    output
}
