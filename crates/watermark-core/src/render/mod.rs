//! Watermark renderers.
//!
//! Both renderers take the base by reference and return a new RGBA image of
//! the same size; the base is never modified.

mod composite;
mod overlay;
mod text;

pub use composite::{blend_over, composite_at, scale_alpha};
pub use overlay::{composite_image_overlay, render_image_overlay, scaled_overlay_size};
pub use text::{font_px_for_width, measure_text, render_text, render_text_with_font};
