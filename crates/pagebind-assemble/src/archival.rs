//! PDF/A conversion through Ghostscript
//!
//! Rewrites a published PDF as PDF/A-1b in place. The conversion renders
//! into a temporary file in the same directory and only replaces the
//! original after Ghostscript reports success, so a failed conversion
//! leaves the plain PDF untouched.

use crate::error::{AssembleError, Result};
use log::{debug, info};
use std::path::Path;
use std::process::Command;

#[cfg(windows)]
const GS_BIN: &str = "gswin64c";
#[cfg(not(windows))]
const GS_BIN: &str = "gs";

/// Check whether Ghostscript is available in the system PATH
///
/// # Errors
///
/// Returns `AssembleError::GhostscriptNotFound` if Ghostscript is not
/// installed or not in PATH
#[must_use = "this function returns the Ghostscript version string that should be used or logged"]
pub fn check_ghostscript_available() -> Result<String> {
    let output = Command::new(GS_BIN)
        .arg("--version")
        .output()
        .map_err(|_| AssembleError::GhostscriptNotFound)?;

    if !output.status.success() {
        return Err(AssembleError::GhostscriptNotFound);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Convert a PDF to PDF/A-1b in place.
///
/// # Errors
///
/// Returns `AssembleError::GhostscriptNotFound` when the binary is missing
/// and `AssembleError::GhostscriptCommandFailed` with Ghostscript's stderr
/// when the conversion itself fails. The input file is only replaced on
/// success.
pub fn convert_to_pdfa(pdf_path: &Path) -> Result<()> {
    let version = check_ghostscript_available()?;
    debug!("using ghostscript {version}");

    let dir = match pdf_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix("pdfa_")
        .suffix(".pdf")
        .tempfile_in(dir)?;

    let output = Command::new(GS_BIN)
        .arg("-dPDFA=1")
        .arg("-dBATCH")
        .arg("-dNOPAUSE")
        .arg("-dNOOUTERSAVE")
        .arg("-dUseCIEColor")
        .arg("-sProcessColorModel=DeviceRGB")
        .arg("-sDEVICE=pdfwrite")
        .arg("-dPDFACompatibilityPolicy=1")
        .arg(format!("-sOutputFile={}", temp.path().display()))
        .arg(pdf_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AssembleError::GhostscriptCommandFailed(
            stderr.lines().last().unwrap_or("unknown error").to_string(),
        ));
    }

    temp.persist(pdf_path)
        .map_err(|e| AssembleError::Io(e.error))?;
    info!("converted to PDF/A: {}", pdf_path.display());
    Ok(())
}
