//! Orientation resolution for photographed document pages
//!
//! Decides the net clockwise rotation (0/90/180/270°) needed for a page
//! image to read upright, using up to three cascaded signals:
//!
//! 1. **EXIF**: the camera's Orientation tag, applied as a physical pixel
//!    correction before anything else looks at the image
//! 2. **Vision**: Canny edges plus straight-segment detection; the median
//!    segment angle classifies the coarse rotation
//! 3. **OSD**: Tesseract's orientation/script detection, run as a
//!    subprocess, consulted only when the vision stage abstains
//!
//! Each detection stage returns an explicit abstention (`None`) rather
//! than a 0° sentinel, so "detected upright" and "could not tell" stay
//! distinct and the cascade knows when to fall through.
//!
//! ## System Requirements
//!
//! - **Tesseract** (optional): used only for the OSD fallback. When the
//!   binary is not in `PATH` the stage degrades to a 0° decision.

/// Error types for orientation operations
pub mod error;
/// EXIF Orientation tag reading and physical correction
pub mod exif;
/// Tesseract orientation/script-detection subprocess
pub mod osd;
/// Edge/line based coarse rotation detection
pub mod vision;

pub use error::{OrientError, Result};
pub use exif::correct_orientation;
pub use osd::check_tesseract_available;

use image::DynamicImage;
use pagebind_core::{OrientationDecision, OrientationSource};

/// Resolve the additional clockwise rotation for an EXIF-corrected image.
///
/// Runs the vision stage first and falls through to OSD only when it
/// abstains. When neither stage can decide the fallback 0° decision is
/// returned; the decision records which stage produced it.
#[must_use]
pub fn resolve(image: &DynamicImage) -> OrientationDecision {
    if let Some(rotation) = vision::detect_rotation(image) {
        return OrientationDecision {
            rotation,
            source: OrientationSource::Vision,
        };
    }

    if let Some(rotation) = osd::detect_rotation(image) {
        return OrientationDecision {
            rotation,
            source: OrientationSource::Ocr,
        };
    }

    OrientationDecision::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use pagebind_core::Rotation;

    #[test]
    fn test_resolve_always_yields_a_90_degree_multiple() {
        // A featureless image: vision abstains, OSD either abstains (no
        // binary, no text) or reports upright. Either way the resolved
        // rotation is a valid multiple of 90.
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            64,
            64,
            image::Rgb([255, 255, 255]),
        ));
        let decision = resolve(&blank);
        assert!(matches!(
            decision.rotation,
            Rotation::R0 | Rotation::R90 | Rotation::R180 | Rotation::R270
        ));
        assert_ne!(decision.source, OrientationSource::Vision);
    }
}
