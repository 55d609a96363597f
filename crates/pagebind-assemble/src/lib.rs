//! PDF document assembly from directories of scanned images
//!
//! This crate turns an ordered set of page images into a single published
//! PDF document:
//!
//! - **Page rendering**: decodes each image, corrects its orientation,
//!   flattens transparency onto white, and plans its placement on an A4
//!   page ([`page`])
//! - **PDF serialization**: embeds the rendered pages as JPEG XObjects in
//!   a minimal, valid PDF ([`pdf`])
//! - **Atomic publication**: writes to a sibling temporary file and
//!   renames it onto the target, preserving the finished bytes when the
//!   rename is blocked ([`assembler`])
//! - **Archival output**: optional in-place PDF/A-1b conversion through
//!   Ghostscript ([`archival`])

pub mod archival;
pub mod assembler;
pub mod error;
pub mod page;
pub mod pdf;

pub use assembler::{publish, AssembleOptions, DocumentAssembler};
pub use error::{AssembleError, Result};
pub use page::{render_page, PageRender};
pub use pdf::generate_pdf;
