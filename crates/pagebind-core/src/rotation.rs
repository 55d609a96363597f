//! Rotation angles and orientation decisions
//!
//! Page photos come in rotated four ways, so the only rotations the
//! pipeline ever applies are clockwise multiples of 90°. The decision
//! record also carries which detection stage produced it, which is what
//! the per-image log lines report.

use std::fmt;

/// A clockwise rotation that is always a multiple of 90°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation needed
    #[default]
    R0,
    /// 90° clockwise
    R90,
    /// 180°
    R180,
    /// 270° clockwise (90° counter-clockwise)
    R270,
}

impl Rotation {
    /// Build a rotation from a detector-reported angle in degrees.
    ///
    /// The angle is reduced modulo 360; anything that is not a multiple of
    /// 90 is coerced to `R0`, since a malformed detector report must never
    /// rotate a page by a partial turn.
    #[must_use]
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            90 => Self::R90,
            180 => Self::R180,
            270 => Self::R270,
            _ => Self::R0,
        }
    }

    /// The clockwise angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// True when applying this rotation would leave the image unchanged.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::R0)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Which stage of the orientation cascade produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSource {
    /// The EXIF Orientation tag (applied as a physical pixel correction)
    Exif,
    /// The edge/line vision detector
    Vision,
    /// The OCR orientation/script-detection service
    Ocr,
    /// No stage could decide; fell back to 0°
    Default,
}

impl fmt::Display for OrientationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exif => "exif",
            Self::Vision => "vision",
            Self::Ocr => "ocr",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// The net clockwise rotation to apply to one image, and where it came
/// from. Produced once per image, consumed immediately, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationDecision {
    /// Clockwise rotation to apply on top of any EXIF correction
    pub rotation: Rotation,
    /// The stage that produced the decision
    pub source: OrientationSource,
}

impl OrientationDecision {
    /// The decision used when every detection stage abstained or failed.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            rotation: Rotation::R0,
            source: OrientationSource::Default,
        }
    }
}

impl fmt::Display for OrientationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.rotation, self.source)
    }
}
