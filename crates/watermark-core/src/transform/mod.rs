//! Geometric transforms on RGBA layers.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Origin is top-left corner, y grows downward
//! - Rotation always expands the canvas so no content is clipped

mod rotation;

pub use rotation::{compute_rotated_bounds, rotate_expand};
pub(crate) use rotation::sample_bilinear;
