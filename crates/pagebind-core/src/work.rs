//! Work units and assembly outcomes
//!
//! A `WorkUnit` is one directory's worth of images destined for one output
//! PDF. Units are created by the discovery pass, owned exclusively by the
//! worker that processes them, and answered with one `AssemblyOutcome`.

use crate::natsort::{natural_key, NaturalKey};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// File extensions (lowercase) that qualify a file as a source page image.
pub const QUALIFYING_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// True when the path has a qualifying image extension (case-insensitive).
///
/// Only the extension is inspected; the caller decides whether the path is
/// a regular file.
#[must_use]
pub fn is_qualifying_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            QUALIFYING_EXTENSIONS.contains(&ext.as_str())
        })
}

/// One source image: a path plus its natural-sort key.
///
/// Immutable; created when a directory is scanned and consumed once by the
/// assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUnit {
    path: PathBuf,
    key: NaturalKey,
}

impl ImageUnit {
    /// Build an image unit, deriving the sort key from the file name.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let key = natural_key(&path.file_name().unwrap_or_default().to_string_lossy());
        Self { path, key }
    }

    /// The source file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name, for log lines.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

impl Ord for ImageUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for ImageUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One directory's worth of naturally ordered images and its output path.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// The directory the images were found in
    pub source_dir: PathBuf,
    /// Qualifying images in natural order
    pub images: Vec<ImageUnit>,
    /// Where the finished PDF is published
    pub output_path: PathBuf,
}

impl WorkUnit {
    /// The output document file name for a source directory
    /// (`<directory-basename>.pdf`).
    #[must_use]
    pub fn document_name(source_dir: &Path) -> String {
        let base = source_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        format!("{base}.pdf")
    }
}

/// How processing of one work unit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Every image made it onto a page and the PDF was published
    Success,
    /// The PDF was published but one or more images were skipped
    Partial,
    /// No PDF was published (or an existing one could not be replaced)
    Failed,
}

/// A worker's report for one work unit. The scheduler collects these and
/// never retries.
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    /// The unit's source directory
    pub source_dir: PathBuf,
    /// The intended output path
    pub output_path: PathBuf,
    /// Final status
    pub status: OutcomeStatus,
    /// Failure or skip context, when there is any
    pub reason: Option<String>,
    /// Pages written into the published PDF
    pub pages: usize,
    /// Source images skipped due to per-image errors
    pub skipped: usize,
}

impl AssemblyOutcome {
    /// A fully successful unit.
    #[must_use]
    pub fn success(unit: &WorkUnit, pages: usize) -> Self {
        Self {
            source_dir: unit.source_dir.clone(),
            output_path: unit.output_path.clone(),
            status: OutcomeStatus::Success,
            reason: None,
            pages,
            skipped: 0,
        }
    }

    /// A published PDF with some images skipped.
    #[must_use]
    pub fn partial(unit: &WorkUnit, pages: usize, skipped: usize, reason: String) -> Self {
        Self {
            source_dir: unit.source_dir.clone(),
            output_path: unit.output_path.clone(),
            status: OutcomeStatus::Partial,
            reason: Some(reason),
            pages,
            skipped,
        }
    }

    /// A unit that produced no (new) output.
    #[must_use]
    pub fn failed(unit: &WorkUnit, reason: String) -> Self {
        Self {
            source_dir: unit.source_dir.clone(),
            output_path: unit.output_path.clone(),
            status: OutcomeStatus::Failed,
            reason: Some(reason),
            pages: 0,
            skipped: 0,
        }
    }

    /// A unit whose document was published but a post-publication step
    /// failed. Keeps the real page and skip counts, since the document
    /// on disk has them.
    #[must_use]
    pub fn failed_after_publish(
        unit: &WorkUnit,
        pages: usize,
        skipped: usize,
        reason: String,
    ) -> Self {
        Self {
            source_dir: unit.source_dir.clone(),
            output_path: unit.output_path.clone(),
            status: OutcomeStatus::Failed,
            reason: Some(reason),
            pages,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifying_extensions() {
        assert!(is_qualifying_image(Path::new("a.jpg")));
        assert!(is_qualifying_image(Path::new("a.JPEG")));
        assert!(is_qualifying_image(Path::new("dir/b.Png")));
        assert!(!is_qualifying_image(Path::new("a.tiff")));
        assert!(!is_qualifying_image(Path::new("a.pdf")));
        assert!(!is_qualifying_image(Path::new("no_extension")));
    }

    #[test]
    fn test_image_units_sort_naturally() {
        let mut units = vec![
            ImageUnit::new(PathBuf::from("scans/img10.jpg")),
            ImageUnit::new(PathBuf::from("scans/img2.jpg")),
            ImageUnit::new(PathBuf::from("scans/img1.jpg")),
        ];
        units.sort();
        let names: Vec<String> = units.iter().map(ImageUnit::file_name).collect();
        assert_eq!(names, vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn test_failed_after_publish_keeps_counts() {
        let unit = WorkUnit {
            source_dir: PathBuf::from("/scans/letters"),
            images: Vec::new(),
            output_path: PathBuf::from("/scans/letters/letters.pdf"),
        };
        let outcome =
            AssemblyOutcome::failed_after_publish(&unit, 3, 1, "conversion failed".to_string());
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.pages, 3);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_document_name_from_basename() {
        assert_eq!(
            WorkUnit::document_name(Path::new("/scans/batch 7")),
            "batch 7.pdf"
        );
    }
}
