//! Edge/line based coarse rotation detection
//!
//! Document pages are full of straight lines: text baselines, ruled paper,
//! table borders, page edges. On an upright page those lines are mostly
//! horizontal; on a page photographed sideways they are mostly vertical.
//! This stage detects straight segments in the edge map and classifies the
//! median segment angle into a 90°-multiple rotation.
//!
//! Contrast is normalized with global histogram equalization before edge
//! detection. A locally adaptive equalization would handle unevenly lit
//! photos better, but `imageproc` offers only the global form; pages with
//! strong lighting gradients may lose edges in the washed-out regions.
//!
//! This is not a deskew algorithm: it only distinguishes coarse quarter
//! turns, and it can misclassify pages with little straight-line content
//! (handwriting, photographs). When no segments are found the stage
//! abstains instead of claiming 0°, and the resolver falls through to the
//! OSD stage.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::equalize_histogram;
use imageproc::edges::canny;
use log::debug;
use pagebind_core::Rotation;
use std::cmp::Ordering;

/// Longer image side is downscaled to this before detection to bound cost.
const MAX_DETECT_DIM: u32 = 1200;
/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
/// Minimum accumulator votes for a candidate line.
const VOTE_THRESHOLD: u32 = 80;
/// Minimum extent of a collinear run to count as a segment, in pixels.
const MIN_SEGMENT_LENGTH: f32 = 30.0;
/// Largest gap between edge pixels inside one segment, in pixels.
const MAX_SEGMENT_GAP: f32 = 10.0;
/// Distance from the ideal line within which an edge pixel belongs to it.
const LINE_BAND_PX: f32 = 1.5;
/// Strongest candidate lines traced for segments; more adds only
/// near-duplicate angles.
const MAX_PEAK_LINES: usize = 32;
/// Median angles within this band of horizontal mean "already upright".
const DECISION_BAND_DEG: f32 = 30.0;

/// A straight edge segment between two edge pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl Segment {
    /// Orientation angle in degrees, normalized into (-90, 90].
    fn angle_degrees(self) -> f32 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let mut angle = if dx == 0.0 {
            90.0
        } else {
            dy.atan2(dx).to_degrees()
        };
        if angle > 90.0 {
            angle -= 180.0;
        }
        if angle <= -90.0 {
            angle += 180.0;
        }
        angle
    }
}

/// Detect the coarse rotation of an (EXIF-corrected) image.
///
/// Returns `None` when no straight segments are found: an abstention,
/// distinct from `Some(Rotation::R0)`, that sends the resolver to the next
/// stage.
#[must_use]
pub fn detect_rotation(image: &DynamicImage) -> Option<Rotation> {
    let gray = downscale(image.to_luma8());
    let equalized = equalize_histogram(&gray);
    let edges = canny(&equalized, CANNY_LOW, CANNY_HIGH);

    let segments = detect_segments(&edges);
    if segments.is_empty() {
        debug!("vision stage abstains: no straight segments detected");
        return None;
    }

    let mut angles: Vec<f32> = segments.iter().map(|s| s.angle_degrees()).collect();
    let median_angle = median(&mut angles);
    let rotation = classify(median_angle);
    debug!(
        "vision stage: {} segments, median angle {:.1}°, rotation {}",
        segments.len(),
        median_angle,
        rotation
    );
    Some(rotation)
}

/// Shrink so the longer side is at most `MAX_DETECT_DIM`, preserving
/// aspect ratio. Smaller images pass through untouched.
fn downscale(gray: GrayImage) -> GrayImage {
    let (w, h) = gray.dimensions();
    let longer = w.max(h);
    if longer <= MAX_DETECT_DIM {
        return gray;
    }
    let scale = MAX_DETECT_DIM as f32 / longer as f32;
    let nw = ((w as f32 * scale) as u32).max(1);
    let nh = ((h as f32 * scale) as u32).max(1);
    imageops::resize(&gray, nw, nh, FilterType::Triangle)
}

/// Extract straight segments from a binary edge map.
///
/// A polar accumulator (1° × 1px bins) finds candidate lines with at least
/// `VOTE_THRESHOLD` supporting edge pixels; each candidate is then traced
/// along its direction, splitting where consecutive pixels are more than
/// `MAX_SEGMENT_GAP` apart and keeping runs of at least
/// `MIN_SEGMENT_LENGTH`.
fn detect_segments(edges: &GrayImage) -> Vec<Segment> {
    let points: Vec<(f32, f32)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| (x as f32, y as f32))
        .collect();
    if points.is_empty() {
        return Vec::new();
    }

    let (w, h) = edges.dimensions();
    let diag = ((w * w + h * h) as f32).sqrt().ceil() as i32;
    let rho_bins = (2 * diag + 1) as usize;

    let trig: Vec<(f32, f32)> = (0..180)
        .map(|t| {
            let rad = (t as f32).to_radians();
            (rad.cos(), rad.sin())
        })
        .collect();

    // Vote: rho = x·cosθ + y·sinθ, binned at 1px resolution.
    let mut acc = vec![0u32; 180 * rho_bins];
    for &(x, y) in &points {
        for (t, &(cos_t, sin_t)) in trig.iter().enumerate() {
            let rho = x * cos_t + y * sin_t;
            let r = (rho.round() as i32 + diag) as usize;
            acc[t * rho_bins + r] += 1;
        }
    }

    // Keep local maxima above the vote threshold, strongest first.
    let mut peaks: Vec<(u32, usize, usize)> = Vec::new();
    for t in 0..180usize {
        for r in 0..rho_bins {
            let votes = acc[t * rho_bins + r];
            if votes < VOTE_THRESHOLD {
                continue;
            }
            if is_local_max(&acc, rho_bins, t, r, votes) {
                peaks.push((votes, t, r));
            }
        }
    }
    peaks.sort_by(|a, b| b.0.cmp(&a.0));
    peaks.truncate(MAX_PEAK_LINES);

    let mut segments = Vec::new();
    for (_, t, r) in peaks {
        let (cos_t, sin_t) = trig[t];
        let rho = (r as i32 - diag) as f32;

        // Edge pixels near the line, ordered by position along it.
        let mut on_line: Vec<(f32, f32, f32)> = points
            .iter()
            .filter(|&&(x, y)| (x * cos_t + y * sin_t - rho).abs() <= LINE_BAND_PX)
            .map(|&(x, y)| (-x * sin_t + y * cos_t, x, y))
            .collect();
        on_line.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut start = 0;
        for i in 1..=on_line.len() {
            let run_ends =
                i == on_line.len() || on_line[i].0 - on_line[i - 1].0 > MAX_SEGMENT_GAP;
            if run_ends {
                let (t0, x1, y1) = on_line[start];
                let (t1, x2, y2) = on_line[i - 1];
                if t1 - t0 >= MIN_SEGMENT_LENGTH {
                    segments.push(Segment { x1, y1, x2, y2 });
                }
                start = i;
            }
        }
    }
    segments
}

fn is_local_max(acc: &[u32], rho_bins: usize, t: usize, r: usize, votes: u32) -> bool {
    for dt in -1i32..=1 {
        for dr in -1i32..=1 {
            if dt == 0 && dr == 0 {
                continue;
            }
            let tt = t as i32 + dt;
            let rr = r as i32 + dr;
            if tt < 0 || tt >= 180 || rr < 0 || rr >= rho_bins as i32 {
                continue;
            }
            if acc[tt as usize * rho_bins + rr as usize] > votes {
                return false;
            }
        }
    }
    true
}

/// Median of the angles; even counts average the middle pair.
fn median(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = values.len();
    let mid = n / 2;
    if n % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Map the median segment angle to a quarter-turn rotation.
fn classify(median_angle: f32) -> Rotation {
    if median_angle.abs() < DECISION_BAND_DEG {
        Rotation::R0
    } else if median_angle > DECISION_BAND_DEG {
        Rotation::R90
    } else if median_angle < -DECISION_BAND_DEG {
        Rotation::R270
    } else {
        Rotation::R0
    }
}
