//! Error types for orientation operations

use thiserror::Error;

/// Errors that can occur while resolving image orientation.
///
/// Detection stages themselves never fail the pipeline; these errors cover
/// the explicit availability probes and temp-file plumbing around them.
#[derive(Error, Debug)]
pub enum OrientError {
    /// Tesseract is not installed or not found in the system `PATH`
    #[error("Tesseract not found in PATH. Install it to enable OSD fallback: <https://tesseract-ocr.github.io/>")]
    TesseractNotFound,

    /// I/O error while staging an image for the OSD subprocess
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be written to the staging file
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized Result type for orientation operations
pub type Result<T> = std::result::Result<T, OrientError>;
