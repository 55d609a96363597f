//! EXIF Orientation handling
//!
//! Cameras record how the sensor was held in the EXIF Orientation tag
//! instead of rotating the pixels. This stage reads the tag from the raw
//! file bytes and applies the correction physically, so every later
//! detection stage sees the pixels a viewer would see.
//!
//! Only the pure-rotation tag values are handled (3, 6, 8); the mirrored
//! variants do not occur on document photos and are left alone. Absent or
//! unreadable EXIF simply means "no correction needed".

use exif::{In, Reader, Tag};
use image::DynamicImage;
use log::debug;
use pagebind_core::{OrientationDecision, OrientationSource, Rotation};
use std::io::Cursor;

/// Read the EXIF Orientation tag value from raw image file bytes.
///
/// Returns `None` when the file carries no EXIF data, the data is
/// unreadable, or the tag is missing; all treated identically upstream.
#[must_use]
pub fn orientation_tag(data: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(data);
    let exif = Reader::new().read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Apply the EXIF orientation correction to a decoded image.
///
/// Tag 3 rotates 180°, tag 6 rotates the content 90° clockwise, tag 8
/// rotates 90° counter-clockwise. Returns the (possibly) corrected image
/// and the decision record when a correction was applied, for the caller
/// to log.
#[must_use]
pub fn correct_orientation(
    data: &[u8],
    image: DynamicImage,
) -> (DynamicImage, Option<OrientationDecision>) {
    let rotation = match orientation_tag(data) {
        Some(3) => Rotation::R180,
        Some(6) => Rotation::R90,
        Some(8) => Rotation::R270,
        Some(tag) => {
            debug!("ignoring EXIF orientation tag value {tag}");
            return (image, None);
        }
        None => return (image, None),
    };

    let corrected = match rotation {
        Rotation::R90 => image.rotate90(),
        Rotation::R180 => image.rotate180(),
        Rotation::R270 => image.rotate270(),
        Rotation::R0 => image,
    };

    let decision = OrientationDecision {
        rotation,
        source: OrientationSource::Exif,
    };
    (corrected, Some(decision))
}
