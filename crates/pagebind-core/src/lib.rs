//! Shared types for the pagebind image-to-PDF pipeline
//!
//! This crate holds the pure building blocks used by every other pagebind
//! crate:
//!
//! - **Natural ordering**: filename sort keys that compare embedded digit
//!   runs numerically (`page2.jpg` before `page10.jpg`)
//! - **Rotations**: the 90°-multiple rotation type and the orientation
//!   decision record produced by the detection cascade
//! - **Page layout**: the A4 page planner that scales and centers an image
//!   on a portrait or landscape page
//! - **Work units**: one directory's worth of images bound for one output
//!   document, plus the outcome record a worker reports back
//!
//! Everything here is side-effect free; file I/O, image decoding, and PDF
//! generation live in the downstream crates.

/// Page geometry planning for A4 output pages
pub mod layout;
/// Natural (digit-aware) filename ordering
pub mod natsort;
/// Rotation angles and orientation decisions
pub mod rotation;
/// Work units, image units, and assembly outcomes
pub mod work;

pub use layout::{plan_page, PageOrientation, PageSpec, A4_HEIGHT_PT, A4_WIDTH_PT};
pub use natsort::{natural_key, NaturalKey};
pub use rotation::{OrientationDecision, OrientationSource, Rotation};
pub use work::{
    is_qualifying_image, AssemblyOutcome, ImageUnit, OutcomeStatus, WorkUnit,
    QUALIFYING_EXTENSIONS,
};
