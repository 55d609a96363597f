//! Pagebind CLI - Bind directories of scanned images into PDF documents
//!
//! Walks a source tree, turns every directory of page images into one PDF
//! with orientation auto-correction and A4 layout, and reports a colored
//! per-directory summary.

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use pagebind_assemble::AssembleOptions;
use pagebind_core::{AssemblyOutcome, OutcomeStatus};
use pagebind_pipeline::Scheduler;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "pagebind",
    about = "Bind directories of scanned images into PDF documents",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process every image directory under a source tree
    #[command(long_about = "Process every image directory under a source tree.\n\
                      \n\
                      Each directory that directly contains JPEG or PNG files becomes one\n\
                      PDF named after the directory. Page order follows natural file-name\n\
                      order; orientation is corrected from EXIF metadata, text-line\n\
                      detection, and Tesseract OSD, in that order.\n\
                      \n\
                      Examples:\n\
                        pagebind run ~/scans\n\
                        pagebind run ~/scans ~/documents --archival")]
    Run {
        /// Directory tree to scan for image directories
        #[arg(value_name = "SOURCE_DIR")]
        source: PathBuf,

        /// Collect all PDFs here instead of beside their source directories
        #[arg(value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Convert each published PDF to PDF/A-1b (requires Ghostscript)
        #[arg(long)]
        archival: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Commands::Run {
            source,
            output,
            archival,
        } => run(&source, output.as_deref(), archival),
    }
}

fn run(source: &std::path::Path, output: Option<&std::path::Path>, archival: bool) -> ExitCode {
    if !source.is_dir() {
        eprintln!(
            "{} source directory not found: {}",
            "Error:".red().bold(),
            source.display()
        );
        return ExitCode::from(2);
    }
    if let Some(out) = output {
        if let Err(e) = fs::create_dir_all(out) {
            eprintln!(
                "{} could not create output directory {}: {e}",
                "Error:".red().bold(),
                out.display()
            );
            return ExitCode::from(2);
        }
    }

    let scheduler = Scheduler::new(AssembleOptions {
        archival,
        ..AssembleOptions::default()
    });
    let outcomes = match scheduler.run(source, output) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            return ExitCode::from(2);
        }
    };

    if outcomes.is_empty() {
        println!("No image directories found under {}", source.display());
        return ExitCode::SUCCESS;
    }
    report(&outcomes);
    ExitCode::SUCCESS
}

fn report(outcomes: &[AssemblyOutcome]) {
    let mut ok = 0usize;
    let mut partial = 0usize;
    let mut failed = 0usize;
    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Success => {
                ok += 1;
                println!(
                    "{} {} ({} pages) -> {}",
                    "✓".green(),
                    outcome.source_dir.display(),
                    outcome.pages,
                    outcome.output_path.display()
                );
            }
            OutcomeStatus::Partial => {
                partial += 1;
                println!(
                    "{} {} ({} pages, {} skipped) -> {}",
                    "~".yellow(),
                    outcome.source_dir.display(),
                    outcome.pages,
                    outcome.skipped,
                    outcome.output_path.display()
                );
                if let Some(reason) = &outcome.reason {
                    println!("    {}", reason.yellow());
                }
            }
            OutcomeStatus::Failed => {
                failed += 1;
                println!("{} {}", "✗".red(), outcome.source_dir.display());
                if let Some(reason) = &outcome.reason {
                    println!("    {}", reason.red());
                }
            }
        }
    }

    println!();
    let summary = format!(
        "{} succeeded, {partial} partial, {failed} failed ({} total)",
        ok,
        outcomes.len()
    );
    if failed > 0 {
        println!("{}", summary.red());
    } else if partial > 0 {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.green());
    }
}
