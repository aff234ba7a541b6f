//! Watermark configuration.
//!
//! A [`WatermarkConfig`] is assembled by the UI layer once per preview or save
//! request and handed to the renderers by reference. Nothing in the engine
//! mutates it, and no state survives between requests.
//!
//! Field names serialize in camelCase so the same value can cross the
//! JavaScript boundary unchanged.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::Anchor;

/// Errors raised while parsing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A colour string was not `#RGB` or `#RRGGBB`.
    #[error("Invalid colour {0:?}: expected #RGB or #RRGGBB")]
    InvalidColor(String),
}

/// Which renderer a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    /// Render `text` with a language-specific font.
    #[default]
    Text,
    /// Paste the image at `overlay_image_path`.
    Image,
}

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build an RGBA pixel from this colour with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Parse `#RGB` or `#RRGGBB` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Rgb::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fully resolved watermark settings for a single render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkConfig {
    /// Renderer selection.
    pub kind: WatermarkKind,
    /// Language id (e.g. "English", "Tamil") or a font file name.
    pub language: String,
    /// Text to draw (text mode only).
    pub text: String,
    /// Counter-clockwise rotation in degrees. Any value is accepted.
    pub angle: i32,
    /// Alpha of fully covered glyph pixels.
    pub text_opacity: u8,
    /// Glyph colour.
    pub color: Rgb,
    /// Where the mark is anchored.
    pub position: Anchor,
    /// Overlay image file (image mode only).
    pub overlay_image_path: Option<PathBuf>,
    /// Overlay size as a percentage of the base image's width and height.
    pub overlay_scale_percent: i32,
    /// Multiplier applied to the overlay's own alpha, out of 255.
    pub overlay_opacity: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::Text,
            language: "English".to_string(),
            text: "Hello World".to_string(),
            angle: 0,
            text_opacity: 180,
            color: Rgb::BLACK,
            position: Anchor::BottomRight,
            overlay_image_path: None,
            overlay_scale_percent: 25,
            overlay_opacity: 150,
        }
    }
}

impl WatermarkConfig {
    /// Text watermark with default styling.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: WatermarkKind::Text,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Image watermark with default scale and opacity.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: WatermarkKind::Image,
            overlay_image_path: Some(path.into()),
            ..Self::default()
        }
    }
}
