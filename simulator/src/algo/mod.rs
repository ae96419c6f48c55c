//! General-purpose numerical helpers

pub mod misc;

pub use misc::{circle_area, lens_area, occluded_area};
