//! Error types for document assembly

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling or publishing a document.
#[derive(Error, Debug)]
pub enum AssembleError {
    /// I/O error reading a source image or writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source image could not be decoded or re-encoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Every image in the unit failed; nothing to publish
    #[error("no images could be processed")]
    NoPages,

    /// The atomic rename onto the target failed (e.g. the target is held
    /// open by another process). The temporary file is preserved.
    #[error(
        "could not replace {target} ({source}); finished document preserved at {temp}",
        target = target.display(),
        temp = temp.display()
    )]
    Publish {
        target: PathBuf,
        temp: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ghostscript is not installed or not found in the system `PATH`
    #[error("Ghostscript not found in PATH. Install it to enable --archival: <https://ghostscript.com/>")]
    GhostscriptNotFound,

    /// Ghostscript ran but the conversion failed
    #[error("Ghostscript conversion failed: {0}")]
    GhostscriptCommandFailed(String),
}

/// A specialized Result type for assembly operations
pub type Result<T> = std::result::Result<T, AssembleError>;
