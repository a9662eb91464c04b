#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// mask to alpha channel compositing.
pub mod alpha;

/// color transformations module.
pub mod color;

/// contour extraction and geometry.
pub mod contours;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// morphological operations module.
pub mod morphology;

/// spatial padding for border handling.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
