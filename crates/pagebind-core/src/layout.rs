//! Page geometry planning
//!
//! Every output page is a physical A4 sheet, flipped to landscape when the
//! (already orientation-corrected) image is wider than tall. The image is
//! scaled uniformly to fit the page and centered on both axes.

/// A4 portrait width in PDF points (210 mm).
pub const A4_WIDTH_PT: f64 = 595.275_590_551_181;
/// A4 portrait height in PDF points (297 mm).
pub const A4_HEIGHT_PT: f64 = 841.889_763_779_528;

/// Whether a page uses the portrait or landscape variant of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

/// Where and how large one image is drawn on its page.
///
/// All dimensions are PDF points. Derived deterministically from the
/// image's post-rotation pixel size; one instance per page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub orientation: PageOrientation,
    pub page_width: f64,
    pub page_height: f64,
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Plan the page for an image of the given pixel dimensions.
///
/// `width > height` selects landscape A4, otherwise portrait. The scale is
/// `min(page_w/w, page_h/h)` and is deliberately not capped at 1: source
/// material is assumed to be near page resolution, so smaller images are
/// upscaled to fill the sheet rather than printed as stamps. Aspect ratio
/// is always preserved; nothing is cropped or stretched.
#[must_use]
pub fn plan_page(width: u32, height: u32) -> PageSpec {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));

    let (orientation, page_width, page_height) = if w > h {
        (PageOrientation::Landscape, A4_HEIGHT_PT, A4_WIDTH_PT)
    } else {
        (PageOrientation::Portrait, A4_WIDTH_PT, A4_HEIGHT_PT)
    };

    let scale = (page_width / w).min(page_height / h);
    let draw_width = w * scale;
    let draw_height = h * scale;

    PageSpec {
        orientation,
        page_width,
        page_height,
        draw_width,
        draw_height,
        offset_x: (page_width - draw_width) / 2.0,
        offset_y: (page_height - draw_height) / 2.0,
    }
}
