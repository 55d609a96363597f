//! Parallel fan-out over work units
//!
//! Each work unit is handed to exactly one worker in a bounded rayon pool.
//! Workers own their unit completely: no shared mutable state, no retries,
//! no cross-unit ordering. A panicking worker fails only its own unit.

use crate::discover::discover_work;
use crate::error::{PipelineError, Result};
use log::{error, info};
use pagebind_assemble::{AssembleOptions, DocumentAssembler};
use pagebind_core::{AssemblyOutcome, WorkUnit};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

/// Upper bound on worker threads regardless of core count.
const MAX_WORKERS: usize = 8;

/// The number of workers to use on this machine.
#[must_use]
pub fn worker_count() -> usize {
    thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_WORKERS)
}

/// Fans work units out over a local thread pool and collects one outcome
/// per unit.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    options: AssembleOptions,
}

impl Scheduler {
    #[must_use]
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Discover work under a source root and process every unit.
    ///
    /// Outcomes arrive in completion order, one per discovered unit. Unit
    /// failures (including worker panics) are reported in the outcomes,
    /// never as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error when the source root is invalid or the worker pool
    /// cannot be built.
    pub fn run(
        &self,
        source_root: &Path,
        output_root: Option<&Path>,
    ) -> Result<Vec<AssemblyOutcome>> {
        let units = discover_work(source_root, output_root)?;
        if units.is_empty() {
            info!("no image directories found under {}", source_root.display());
            return Ok(Vec::new());
        }

        let workers = worker_count();
        info!("processing {} directories with {workers} workers", units.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;

        let assembler = DocumentAssembler::new(self.options.clone());
        let (tx, rx) = mpsc::channel();
        pool.scope(|scope| {
            for unit in &units {
                let tx = tx.clone();
                let assembler = &assembler;
                scope.spawn(move |_| {
                    let outcome = process_unit(assembler, unit);
                    // Receiver outlives the scope; send cannot fail.
                    let _ = tx.send(outcome);
                });
            }
        });
        drop(tx);

        Ok(rx.into_iter().collect())
    }
}

fn process_unit(assembler: &DocumentAssembler, unit: &WorkUnit) -> AssemblyOutcome {
    match catch_unwind(AssertUnwindSafe(|| assembler.assemble(unit))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(&payload);
            error!(
                "[{}] worker panicked: {message}",
                unit.source_dir.display()
            );
            AssemblyOutcome::failed(unit, format!("worker panicked: {message}"))
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pagebind_core::OutcomeStatus;
    use std::fs;

    fn write_ruled_page(path: &Path) {
        let mut img = RgbImage::from_pixel(320, 240, Rgb([255, 255, 255]));
        for y0 in [60u32, 120] {
            for y in y0..y0 + 3 {
                for x in 20..300 {
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_worker_count_is_bounded() {
        let n = worker_count();
        assert!(n >= 1 && n <= MAX_WORKERS);
    }

    #[test]
    fn test_run_produces_one_outcome_per_directory() {
        let root = tempfile::tempdir().unwrap();
        for name in ["alpha", "beta"] {
            let dir = root.path().join(name);
            fs::create_dir(&dir).unwrap();
            write_ruled_page(&dir.join("page1.png"));
        }

        let outcomes = Scheduler::default().run(root.path(), None).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Success && o.output_path.exists()));
    }

    #[test]
    fn test_run_with_no_images_returns_empty() {
        let root = tempfile::tempdir().unwrap();
        let outcomes = Scheduler::default().run(root.path(), None).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_failed_unit_does_not_poison_siblings() {
        let root = tempfile::tempdir().unwrap();
        let good = root.path().join("good");
        let bad = root.path().join("bad");
        fs::create_dir(&good).unwrap();
        fs::create_dir(&bad).unwrap();
        write_ruled_page(&good.join("page1.png"));
        fs::write(bad.join("page1.png"), b"not an image").unwrap();

        let outcomes = Scheduler::default().run(root.path(), None).unwrap();
        assert_eq!(outcomes.len(), 2);
        let by_dir = |d: &Path| outcomes.iter().find(|o| o.source_dir == d).unwrap();
        assert_eq!(by_dir(&good).status, OutcomeStatus::Success);
        assert_eq!(by_dir(&bad).status, OutcomeStatus::Failed);
        assert!(!bad.join("bad.pdf").exists());
    }
}
