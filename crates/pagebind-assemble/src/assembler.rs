//! Document assembly and atomic publication
//!
//! Renders a work unit's images into pages in natural order, serializes
//! them into one PDF, and publishes it atomically: the bytes are written
//! to a temporary file in the output directory and renamed onto the target
//! in a single step, so a crash or a failed unit never leaves a
//! half-written document where a good one used to be.

use crate::error::{AssembleError, Result};
use crate::page::{render_page, PageRender};
use crate::{archival, pdf};
use log::{error, info, warn};
use pagebind_core::{AssemblyOutcome, WorkUnit};
use std::io::Write;
use std::path::Path;

/// Knobs for document assembly.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// JPEG quality for embedded page images (1-100)
    pub jpeg_quality: u8,
    /// Convert the published PDF to PDF/A-1b with Ghostscript
    pub archival: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            archival: false,
        }
    }
}

/// Turns one work unit into one published PDF.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    options: AssembleOptions,
}

impl DocumentAssembler {
    #[must_use]
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Assemble and publish a work unit's document.
    ///
    /// Per-image failures are logged and skipped; the document continues
    /// with the remaining images in order. Only document-level failures
    /// (nothing decodable, fatal write, rename conflict, archival
    /// conversion) fail the unit, and they never touch a prior output.
    #[must_use]
    pub fn assemble(&self, unit: &WorkUnit) -> AssemblyOutcome {
        info!(
            "[{}] assembling {} images -> {}",
            unit.source_dir.display(),
            unit.images.len(),
            unit.output_path.display()
        );

        let mut pages: Vec<PageRender> = Vec::with_capacity(unit.images.len());
        let mut skipped = Vec::new();
        for image in &unit.images {
            match render_page(image, self.options.jpeg_quality) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    warn!(
                        "[{}] skipping {}: {e}",
                        unit.source_dir.display(),
                        image.file_name()
                    );
                    skipped.push(format!("{}: {e}", image.file_name()));
                }
            }
        }

        if pages.is_empty() {
            error!(
                "[{}] {}",
                unit.source_dir.display(),
                AssembleError::NoPages
            );
            return AssemblyOutcome::failed(unit, AssembleError::NoPages.to_string());
        }

        let data = pdf::generate_pdf(&pages);
        if let Err(e) = publish(&data, &unit.output_path) {
            error!("[{}] {e}", unit.source_dir.display());
            return AssemblyOutcome::failed(unit, e.to_string());
        }
        info!(
            "[{}] published {} pages -> {}",
            unit.source_dir.display(),
            pages.len(),
            unit.output_path.display()
        );

        if self.options.archival {
            if let Err(e) = archival::convert_to_pdfa(&unit.output_path) {
                error!("[{}] {e}", unit.source_dir.display());
                return AssemblyOutcome::failed_after_publish(
                    unit,
                    pages.len(),
                    skipped.len(),
                    format!("archival conversion failed (plain PDF retained): {e}"),
                );
            }
        }

        if skipped.is_empty() {
            AssemblyOutcome::success(unit, pages.len())
        } else {
            let count = skipped.len();
            AssemblyOutcome::partial(unit, pages.len(), count, skipped.join("; "))
        }
    }
}

/// Write the document bytes next to the target and atomically rename them
/// onto it.
///
/// The temporary file lives in the target's directory so the rename stays
/// on one filesystem. On a rename conflict the temporary file is kept and
/// its path reported; on any earlier failure it is removed when the handle
/// drops.
///
/// # Errors
///
/// Returns `AssembleError::Publish` when the rename fails and an I/O error
/// for anything before it.
pub fn publish(data: &[u8], target: &Path) -> Result<()> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = target
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{stem}_"))
        .suffix(".pdf")
        .tempfile_in(dir)?;
    temp.write_all(data)?;
    temp.flush()?;

    match temp.persist(target) {
        Ok(_) => Ok(()),
        Err(persist_err) => {
            let source = persist_err.error;
            // Keep the finished bytes around so the user can move them by
            // hand once the target is no longer held open.
            let temp_path = match persist_err.file.keep() {
                Ok((_, path)) => path,
                Err(keep_err) => keep_err.file.path().to_path_buf(),
            };
            Err(AssembleError::Publish {
                target: target.to_path_buf(),
                temp: temp_path,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pagebind_core::{ImageUnit, OutcomeStatus};
    use std::fs;
    use std::path::PathBuf;

    /// A white page with horizontal rules, so the vision stage decides 0°
    /// and the OSD fallback is never consulted.
    fn write_ruled_page(path: &Path, width: u32, height: u32) {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let rows = [height / 4, height / 2];
        for y0 in rows {
            for y in y0..y0 + 3 {
                for x in 20..width - 20 {
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        img.save(path).unwrap();
    }

    fn unit_for(dir: &Path, names: &[&str], output: PathBuf) -> WorkUnit {
        let mut images: Vec<ImageUnit> =
            names.iter().map(|n| ImageUnit::new(dir.join(n))).collect();
        images.sort();
        WorkUnit {
            source_dir: dir.to_path_buf(),
            images,
            output_path: output,
        }
    }

    #[test]
    fn test_assemble_two_pages() {
        let dir = tempfile::tempdir().unwrap();
        write_ruled_page(&dir.path().join("a.png"), 400, 280);
        write_ruled_page(&dir.path().join("b.png"), 280, 400);
        let out = dir.path().join("scans.pdf");
        let unit = unit_for(dir.path(), &["a.png", "b.png"], out.clone());

        let outcome = DocumentAssembler::default().assemble(&unit);
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.pages, 2);
        let data = fs::read(&out).unwrap();
        assert!(data.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_corrupt_image_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_ruled_page(&dir.path().join("page1.png"), 300, 200);
        fs::write(dir.path().join("page2.png"), b"garbage").unwrap();
        write_ruled_page(&dir.path().join("page3.png"), 300, 200);
        let out = dir.path().join("scans.pdf");
        let unit = unit_for(dir.path(), &["page1.png", "page2.png", "page3.png"], out.clone());

        let outcome = DocumentAssembler::default().assemble(&unit);
        assert_eq!(outcome.status, OutcomeStatus::Partial);
        assert_eq!(outcome.pages, 2);
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.reason.unwrap().contains("page2.png"));
        assert!(out.exists());
    }

    #[test]
    fn test_all_images_corrupt_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.jpg"), b"nope").unwrap();
        let out = dir.path().join("scans.pdf");
        let unit = unit_for(dir.path(), &["x.jpg"], out.clone());

        let outcome = DocumentAssembler::default().assemble(&unit);
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(!out.exists());
    }

    #[test]
    fn test_publish_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.pdf");
        fs::write(&target, b"old bytes").unwrap();

        publish(b"%PDF-new", &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"%PDF-new");
        // No stray temp files remain after a successful publish.
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_publish_conflict_preserves_temp_and_target() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the rename fail the same
        // way a locked file does, without platform-specific locking.
        let target = dir.path().join("doc.pdf");
        fs::create_dir(&target).unwrap();

        let err = publish(b"%PDF-new", &target).unwrap_err();
        let AssembleError::Publish { temp, .. } = &err else {
            panic!("expected publish error, got {err}");
        };
        assert!(temp.exists(), "temp file should be preserved");
        assert_eq!(fs::read(temp).unwrap(), b"%PDF-new");
        assert!(target.is_dir(), "target must be untouched");
        assert!(err.to_string().contains(&temp.display().to_string()));
    }

    #[test]
    fn test_rerun_keeps_target_valid() {
        let dir = tempfile::tempdir().unwrap();
        write_ruled_page(&dir.path().join("a.png"), 300, 200);
        let out = dir.path().join("scans.pdf");
        let unit = unit_for(dir.path(), &["a.png"], out.clone());

        let assembler = DocumentAssembler::default();
        assert_eq!(assembler.assemble(&unit).status, OutcomeStatus::Success);
        assert_eq!(assembler.assemble(&unit).status, OutcomeStatus::Success);
        assert!(fs::read(&out).unwrap().starts_with(b"%PDF-"));
    }
}
