//! Error types for the processing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or scheduling work.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source root does not exist or is not a directory
    #[error("source directory not found or not a directory: {0}")]
    SourceNotFound(PathBuf),

    /// I/O error walking the source tree
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool could not be built
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// A specialized Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
