//! Anchor-based placement of a mark on a base image.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the base image
//! - Returned offsets are the top-left corner of the mark
//! - Offsets may be negative when the mark is larger than the base; the
//!   compositing step clips whatever falls off the canvas

use serde::{Deserialize, Serialize};

/// Distance kept between an edge-anchored mark and the image border.
pub const MARGIN: i32 = 10;

/// Named placement of a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];

    /// Parse an anchor name leniently.
    ///
    /// Case, `-`, `_` and spaces are ignored, so "top-left", "TopLeft" and
    /// "TOP_LEFT" are equivalent. Anything unrecognised is `BottomRight`.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "topleft" => Anchor::TopLeft,
            "topright" => Anchor::TopRight,
            "bottomleft" => Anchor::BottomLeft,
            "center" | "centre" => Anchor::Center,
            _ => Anchor::BottomRight,
        }
    }
}

impl From<&str> for Anchor {
    fn from(value: &str) -> Self {
        Anchor::from_name(value)
    }
}

impl From<String> for Anchor {
    fn from(value: String) -> Self {
        Anchor::from_name(&value)
    }
}

/// Compute the top-left offset of a mark of `overlay` size on a `base`.
///
/// Both sizes are `(width, height)`. Centering uses floor division so the
/// result is stable for marks larger than the base.
///
/// # Example
///
/// ```
/// use watermark_core::position::{resolve_position, Anchor};
///
/// assert_eq!(resolve_position(Anchor::BottomRight, (800, 600), (100, 50)), (690, 540));
/// ```
pub fn resolve_position(anchor: Anchor, base: (u32, u32), overlay: (u32, u32)) -> (i32, i32) {
    let (base_w, base_h) = (base.0 as i64, base.1 as i64);
    let (mark_w, mark_h) = (overlay.0 as i64, overlay.1 as i64);
    let m = MARGIN as i64;

    let (x, y) = match anchor {
        Anchor::TopLeft => (m, m),
        Anchor::TopRight => (base_w - mark_w - m, m),
        Anchor::BottomLeft => (m, base_h - mark_h - m),
        Anchor::BottomRight => (base_w - mark_w - m, base_h - mark_h - m),
        Anchor::Center => ((base_w - mark_w).div_euclid(2), (base_h - mark_h).div_euclid(2)),
    };

    (saturate(x), saturate(y))
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}


// ============================================================================
// Property-Based Tests
// ============================================================================
