//! Flattening and encoding for export.
//!
//! Export always writes an opaque image: the composited RGBA buffer is
//! flattened over a background colour, then encoded in the format implied by
//! the target file's extension.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::config::Rgb as Color;

/// Default JPEG quality for export.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The target extension does not name a supported format.
    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the output file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raster formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl ExportFormat {
    /// Format for a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "bmp" => Some(ExportFormat::Bmp),
            "tif" | "tiff" => Some(ExportFormat::Tiff),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| EncodeError::UnsupportedFormat(ext.to_string()))
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Bmp => "bmp",
            ExportFormat::Tiff => "tiff",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Bmp => ImageFormat::Bmp,
            ExportFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Colour that transparent regions are flattened against.
    pub background: Color,
    /// JPEG quality (1-100). Ignored by the lossless formats.
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Composite `image` over an opaque `background`, dropping the alpha channel.
pub fn flatten(image: &RgbaImage, background: Color) -> RgbImage {
    let bg = [background.r as u32, background.g as u32, background.b as u32];

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let a = p[3] as u32;
        let mix = |c: u8, b: u32| ((c as u32 * a + b * (255 - a) + 127) / 255) as u8;
        Rgb([mix(p[0], bg[0]), mix(p[1], bg[1]), mix(p[2], bg[2])])
    })
}

/// Flatten and encode `image` to bytes in `format`.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival
/// * 80-90: Good quality, recommended for most uses
/// * Below 60: Low quality, visible artifacts
pub fn encode_image(
    image: &RgbaImage,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let rgb = flatten(image, options.background);
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ExportFormat::Jpeg => {
            // Clamp quality to valid range (1-100)
            let quality = options.jpeg_quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
        _ => {
            DynamicImage::ImageRgb8(rgb)
                .write_to(&mut buffer, format.image_format())
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
    }

    Ok(buffer.into_inner())
}

/// Flatten `image` and write it to `path` in the format its extension names.
///
/// The file is encoded in memory, written to a temporary sibling and renamed
/// into place, so a failure never leaves a truncated file at `path`.
pub fn flatten_and_encode(
    image: &RgbaImage,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    let bytes = encode_image(image, format, options)?;

    let io_err = |source: std::io::Error| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    debug!(path = %path.display(), ?format, bytes = bytes.len(), "Exported image");
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
