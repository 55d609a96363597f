//! Work discovery
//!
//! Walks a source tree and turns every directory that directly contains
//! page images into a `WorkUnit`. Nesting does not matter: each qualifying
//! directory becomes its own document, and images never cross directory
//! boundaries.

use crate::error::{PipelineError, Result};
use log::{debug, warn};
use pagebind_core::{is_qualifying_image, ImageUnit, WorkUnit};
use std::fs;
use std::path::{Path, PathBuf};

/// Find every work unit under a source root.
///
/// A directory qualifies when it directly contains at least one file with
/// a qualifying image extension. The output path is `<basename>.pdf`
/// beside the source directory, or inside `output_root` when given; with
/// an output root, directories sharing a basename overwrite each other's
/// document.
///
/// Unreadable subdirectories are logged and skipped. Units are returned in
/// path order.
///
/// # Errors
///
/// Returns `PipelineError::SourceNotFound` when the root is not a
/// directory.
pub fn discover_work(source_root: &Path, output_root: Option<&Path>) -> Result<Vec<WorkUnit>> {
    if !source_root.is_dir() {
        return Err(PipelineError::SourceNotFound(source_root.to_path_buf()));
    }

    let mut units = Vec::new();
    let mut pending = vec![source_root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skipping unreadable directory {}: {e}", dir.display());
                continue;
            }
        };

        let mut images = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if is_qualifying_image(&path) {
                images.push(ImageUnit::new(path));
            }
        }
        subdirs.sort();
        pending.extend(subdirs);

        if images.is_empty() {
            continue;
        }
        images.sort();
        let output_path = output_path_for(&dir, output_root);
        debug!(
            "discovered {} images in {} -> {}",
            images.len(),
            dir.display(),
            output_path.display()
        );
        units.push(WorkUnit {
            source_dir: dir,
            images,
            output_path,
        });
    }

    units.sort_by(|a, b| a.source_dir.cmp(&b.source_dir));
    Ok(units)
}

fn output_path_for(source_dir: &Path, output_root: Option<&Path>) -> PathBuf {
    let name = WorkUnit::document_name(source_dir);
    match output_root {
        Some(root) => root.join(name),
        None => source_dir.join(name),
    }
}
