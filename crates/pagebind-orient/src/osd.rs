//! Tesseract orientation/script detection (OSD)
//!
//! Fallback stage, consulted only when the vision stage abstains. The
//! EXIF-corrected image is staged to a temporary PNG and handed to the
//! `tesseract` binary in OSD-only mode (`--psm 0`), whose report includes
//! the clockwise rotation needed for the text to read upright:
//!
//! ```text
//! Page number: 0
//! Orientation in degrees: 270
//! Rotate: 90
//! Orientation confidence: 15.39
//! Script: Latin
//! ```
//!
//! An absent binary, a failed run, or a malformed report never crashes the
//! pipeline; the stage degrades per the cascade rules.

use crate::error::{OrientError, Result};
use image::DynamicImage;
use log::{debug, warn};
use pagebind_core::Rotation;
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;

static RE_ROTATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rotate:\s*(-?\d+)").expect("valid rotate regex"));

/// Check that Tesseract is available in the system `PATH`.
///
/// # Errors
///
/// Returns `OrientError::TesseractNotFound` if the binary is not installed
/// or not in `PATH`.
#[must_use = "this function returns the Tesseract version string that should be used or logged"]
pub fn check_tesseract_available() -> Result<String> {
    let output = Command::new("tesseract")
        .arg("--version")
        .output()
        .map_err(|_| OrientError::TesseractNotFound)?;

    if !output.status.success() {
        return Err(OrientError::TesseractNotFound);
    }

    // Version goes to stdout on recent releases, stderr on older ones.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = stdout
        .lines()
        .chain(stderr.lines())
        .next()
        .unwrap_or("unknown")
        .to_string();

    Ok(version)
}

/// Detect the clockwise rotation for an image via Tesseract OSD.
///
/// Returns `None` when the binary is unavailable, the run fails, or the
/// report carries no usable `Rotate:` line. A parsed angle that is not a
/// multiple of 90° is coerced to 0° rather than trusted.
#[must_use]
pub fn detect_rotation(image: &DynamicImage) -> Option<Rotation> {
    // Tesseract reads files, not pipes; stage the corrected pixels so OSD
    // never sees the pre-correction image.
    let staged = match stage_image(image) {
        Ok(f) => f,
        Err(e) => {
            warn!("OSD stage unavailable: could not stage image: {e}");
            return None;
        }
    };

    let output = match Command::new("tesseract")
        .arg(staged.path())
        .arg("stdout")
        .arg("--psm")
        .arg("0")
        .output()
    {
        Ok(o) => o,
        Err(e) => {
            debug!("OSD stage unavailable: tesseract not runnable: {e}");
            return None;
        }
    };

    if !output.status.success() {
        warn!(
            "OSD run failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let report = String::from_utf8_lossy(&output.stdout);
    parse_osd_report(&report)
}

/// Write the image to a temporary PNG the subprocess can read. The file is
/// removed when the returned handle drops.
fn stage_image(image: &DynamicImage) -> Result<tempfile::NamedTempFile> {
    let staged = tempfile::Builder::new()
        .prefix("pagebind_osd_")
        .suffix(".png")
        .tempfile()?;
    image.save(staged.path())?;
    Ok(staged)
}

/// Parse the `Rotate: N` line from an OSD report.
fn parse_osd_report(report: &str) -> Option<Rotation> {
    let captures = RE_ROTATE.captures(report)?;
    let angle: i64 = captures.get(1)?.as_str().parse().ok()?;
    let rotation = Rotation::from_degrees(angle);
    if i64::from(rotation.degrees()) != angle.rem_euclid(360) {
        warn!("OSD reported non-quarter rotation {angle}°, using 0°");
    }
    Some(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: &str = "Page number: 0\n\
Orientation in degrees: 270\n\
Rotate: 90\n\
Orientation confidence: 15.39\n\
Script: Latin\n\
Script confidence: 4.14\n";

    #[test]
    fn test_parse_full_report() {
        assert_eq!(parse_osd_report(SAMPLE_REPORT), Some(Rotation::R90));
    }

    #[test]
    fn test_parse_each_quarter_turn() {
        for (angle, expected) in [
            (0, Rotation::R0),
            (90, Rotation::R90),
            (180, Rotation::R180),
            (270, Rotation::R270),
        ] {
            let report = format!("Rotate: {angle}\n");
            assert_eq!(parse_osd_report(&report), Some(expected));
        }
    }

    #[test]
    fn test_parse_missing_rotate_line() {
        assert_eq!(parse_osd_report("Script: Latin\n"), None);
        assert_eq!(parse_osd_report(""), None);
    }

    #[test]
    fn test_non_quarter_angle_coerces_to_zero() {
        assert_eq!(parse_osd_report("Rotate: 45\n"), Some(Rotation::R0));
        assert_eq!(parse_osd_report("Rotate: 181\n"), Some(Rotation::R0));
    }

    #[test]
    fn test_negative_angle_wraps() {
        assert_eq!(parse_osd_report("Rotate: -90\n"), Some(Rotation::R270));
    }

    #[test]
    fn test_large_angle_wraps() {
        assert_eq!(parse_osd_report("Rotate: 450\n"), Some(Rotation::R90));
    }
}
