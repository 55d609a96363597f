//! Directory discovery and parallel scheduling
//!
//! Ties the pipeline together: walk a source tree for directories of page
//! images ([`discover`]), then process each directory as an independent
//! work unit on a bounded worker pool ([`scheduler`]). Every unit answers
//! with exactly one outcome; failures stay contained to their unit.

pub mod discover;
pub mod error;
pub mod scheduler;

pub use discover::discover_work;
pub use error::{PipelineError, Result};
pub use scheduler::{worker_count, Scheduler};
