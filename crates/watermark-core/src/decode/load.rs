//! Decoding base and overlay images to RGBA.

use std::io::Cursor;
use std::path::Path;

use image::{ImageError, ImageReader, RgbaImage};
use tracing::debug;

use super::orientation::{apply_orientation, read_orientation};

/// Decode an encoded image of any enabled format to RGBA, applying EXIF
/// orientation so photos come out upright.
///
/// # Errors
///
/// Returns the `image` crate's error when the format cannot be guessed or
/// the data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, ImageError> {
    // Read orientation before the bytes are consumed by the decoder
    let orientation = read_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    debug!(
        width = img.width(),
        height = img.height(),
        ?orientation,
        "Decoded image"
    );

    Ok(apply_orientation(img, orientation).into_rgba8())
}

/// Read and decode an image file.
///
/// The format is detected from the content, not the extension.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage, ImageError> {
    let bytes = std::fs::read(path.as_ref()).map_err(ImageError::IoError)?;
    decode_image(&bytes)
}
