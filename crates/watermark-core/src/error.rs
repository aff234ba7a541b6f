//! Errors surfaced to callers of the engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::encode::EncodeError;

/// Failures a caller has to handle.
///
/// Font problems are deliberately absent: the font resolver always recovers
/// with its bitmap fallback.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// A required input is not available yet.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// The overlay image could not be read or decoded. The base is untouched.
    #[error("Failed to load overlay image {path}: {source}")]
    OverlayLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The base image could not be read or decoded.
    #[error("Failed to load base image {path}: {source}")]
    BaseLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Export failed; no partial file was written.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
