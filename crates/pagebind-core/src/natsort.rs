//! Natural (digit-aware) filename ordering
//!
//! Plain lexicographic ordering puts `page10.jpg` before `page2.jpg`, which
//! scrambles scanned page sequences. The key produced here splits a name
//! into alternating non-digit and digit runs, comparing digit runs as
//! integers and non-digit runs case-insensitively, so page order follows
//! the embedded page numbers.

use std::cmp::Ordering;

/// One run of a filename: either non-digit text or a digit run.
///
/// Digit runs keep their leading-zero-stripped form; comparing stripped
/// length first and digits lexicographically second is exactly integer
/// comparison, without any overflow ceiling on run length.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Digits(String),
}

impl Segment {
    fn cmp_segment(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Digits(a), Self::Digits(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Digit runs sort before text runs, mirroring ASCII where
            // '0'..'9' precede letters.
            (Self::Digits(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Digits(_)) => Ordering::Greater,
        }
    }
}

/// A total-order sort key for one filename.
///
/// Ties on the segment sequence (e.g. `A1.jpg` vs `a01.JPG`) are broken by
/// the original string, so equal keys imply equal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    segments: Vec<Segment>,
    original: String,
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = self.segments.len().min(other.segments.len());
        for i in 0..common {
            match self.segments[i].cmp_segment(&other.segments[i]) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.segments
            .len()
            .cmp(&other.segments.len())
            .then_with(|| self.original.cmp(&other.original))
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the natural sort key for a filename.
///
/// Guarantees `natural_key("img2.jpg") < natural_key("img10.jpg")
/// < natural_key("img100.jpg")`. Pure function; no filesystem access.
#[must_use]
pub fn natural_key(name: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut run = String::new();
    let mut run_is_digits = false;

    for ch in name.chars() {
        let is_digit = ch.is_ascii_digit();
        if !run.is_empty() && is_digit != run_is_digits {
            segments.push(finish_run(run, run_is_digits));
            run = String::new();
        }
        run_is_digits = is_digit;
        if is_digit {
            run.push(ch);
        } else {
            run.extend(ch.to_lowercase());
        }
    }
    if !run.is_empty() {
        segments.push(finish_run(run, run_is_digits));
    }

    NaturalKey {
        segments,
        original: name.to_string(),
    }
}

fn finish_run(run: String, is_digits: bool) -> Segment {
    if is_digits {
        let stripped = run.trim_start_matches('0');
        if stripped.is_empty() {
            // All zeros: the value is 0.
            Segment::Digits(String::new())
        } else {
            Segment::Digits(stripped.to_string())
        }
    } else {
        Segment::Text(run)
    }
}
