//! Per-image page rendering
//!
//! Turns one source image into everything a PDF page needs: the EXIF
//! correction and orientation cascade are applied, alpha is flattened over
//! white, the pixels are normalized to opaque RGB and re-encoded as JPEG,
//! and the page geometry is planned from the final dimensions.

use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, Rgb, RgbImage};
use log::debug;
use pagebind_core::{plan_page, ImageUnit, PageSpec, Rotation};
use pagebind_orient::correct_orientation;
use std::fs;

/// A fully prepared page: JPEG-encoded pixels plus their geometry.
#[derive(Debug, Clone)]
pub struct PageRender {
    /// DCT-encoded page image, embedded verbatim in the PDF
    pub jpeg: Vec<u8>,
    /// Pixel width after rotation
    pub width: u32,
    /// Pixel height after rotation
    pub height: u32,
    /// Page size and placement
    pub spec: PageSpec,
}

/// Render one source image into a page.
///
/// # Errors
///
/// Returns an error when the file cannot be read, decoded, or re-encoded.
/// Orientation detection itself never fails; its stages abstain instead.
pub fn render_page(unit: &ImageUnit, jpeg_quality: u8) -> Result<PageRender> {
    let data = fs::read(unit.path())?;
    let decoded = image::load_from_memory(&data)?;

    // EXIF correction is physical, so detection below sees upright-as-shot
    // pixels rather than the raw sensor orientation.
    let (corrected, exif_decision) = correct_orientation(&data, decoded);
    if let Some(decision) = exif_decision {
        debug!("{}: EXIF correction {}", unit.file_name(), decision);
    }

    let decision = pagebind_orient::resolve(&corrected);
    if !decision.rotation.is_identity() {
        debug!("{}: rotating {}", unit.file_name(), decision);
    }
    let rotated = apply_rotation(corrected, decision.rotation);

    let rgb = flatten_to_rgb(rotated);
    let (width, height) = rgb.dimensions();
    let spec = plan_page(width, height);
    let jpeg = encode_jpeg(&rgb, jpeg_quality)?;

    Ok(PageRender {
        jpeg,
        width,
        height,
        spec,
    })
}

/// Apply a clockwise quarter-turn rotation, expanding the canvas.
fn apply_rotation(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::R0 => image,
        Rotation::R90 => image.rotate90(),
        Rotation::R180 => image.rotate180(),
        Rotation::R270 => image.rotate270(),
    }
}

/// Normalize to fully opaque three-channel RGB.
///
/// Images with an alpha channel are composited over an opaque white
/// background, using alpha as the blend mask; everything else converts
/// directly.
fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut flat = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let out = flat.get_pixel_mut(x, y);
        for c in 0..3 {
            let src = u16::from(pixel[c]);
            out[c] = ((src * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
    }
    flat
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (w, h) = rgb.dimensions();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)?;
    Ok(buf)
}
