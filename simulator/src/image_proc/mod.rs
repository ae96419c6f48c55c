//! Canvas rendering for the orbit and transit views
//!
//! Views are 8-bit canvases (`Array2<u8>`) built from filled disks. The
//! transit projector reads its intensity straight off such a canvas; the
//! orbit view is produced for external display only.

pub mod canvas;
pub mod image;
pub mod render;

pub use canvas::CanvasSize;
pub use self::image::{canvas_to_gray_image, save_canvas};
pub use render::{fill_disk, mean_intensity, render_orbit_view};
