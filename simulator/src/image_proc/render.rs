//! Disk rasterisation and the orbit view.
//!
//! Every view in the simulator is built from filled disks on an 8-bit canvas.
//! A pixel belongs to a disk when its integer coordinate lies within the
//! radius of the disk's centre, so overlapping disks cover each pixel once
//! and the last disk drawn wins.

use ndarray::{s, Array2, Zip};
use rayon::prelude::*;

use super::canvas::CanvasSize;
use crate::orbit::{BodyId, BodyPosition};

/// Pixel value of the star's disk
pub const STAR_LEVEL: u8 = 255;
/// Pixel value of planets on the orbit view
pub const PLANET_LEVEL: u8 = 150;
/// Pixel value of moons on the orbit view
pub const MOON_LEVEL: u8 = 100;

/// Fill the disk centred on (`cx`, `cy`) with `value`.
///
/// Only the bounding box of the disk is visited and its pixels are processed
/// in parallel. Disks partially or fully off the canvas are clipped.
///
/// # Arguments
/// * `canvas` - Canvas indexed `[row, col]`
/// * `cx` - Centre column, may be fractional
/// * `cy` - Centre row, may be fractional
/// * `radius` - Disk radius in pixels; negative or NaN radii draw nothing
/// * `value` - Pixel value written inside the disk
pub fn fill_disk(canvas: &mut Array2<u8>, cx: f64, cy: f64, radius: f64, value: u8) {
    if radius.is_nan() || radius < 0.0 || !cx.is_finite() || !cy.is_finite() {
        return;
    }
    let (height, width) = canvas.dim();

    let col_min = (cx - radius).floor().max(0.0) as usize;
    let col_max = ((cx + radius).floor() + 1.0).clamp(0.0, width as f64) as usize;
    let row_min = (cy - radius).floor().max(0.0) as usize;
    let row_max = ((cy + radius).floor() + 1.0).clamp(0.0, height as f64) as usize;
    if col_min >= col_max || row_min >= row_max {
        return;
    }

    let r2 = radius * radius;
    let window = canvas.slice_mut(s![row_min..row_max, col_min..col_max]);
    Zip::indexed(window).par_for_each(|(row, col), pixel| {
        let dx = (col + col_min) as f64 - cx;
        let dy = (row + row_min) as f64 - cy;
        if dx * dx + dy * dy <= r2 {
            *pixel = value;
        }
    });
}

/// Mean pixel value over the whole canvas. Zero for an empty canvas.
pub fn mean_intensity(canvas: &Array2<u8>) -> f64 {
    if canvas.is_empty() {
        return 0.0;
    }
    let total: u64 = canvas.par_iter().map(|&v| u64::from(v)).sum();
    total as f64 / canvas.len() as f64
}

/// Render the top-down orbit view.
///
/// Bodies are drawn in the order given, planets and moons at distinct grey
/// levels, then the star is drawn over them at the canvas centre.
///
/// # Arguments
/// * `size` - Canvas dimensions
/// * `star_radius` - Star radius in pixels
/// * `positions` - Body centres in canvas coordinates
///
/// # Returns
/// A new canvas holding the view
pub fn render_orbit_view(
    size: &CanvasSize,
    star_radius: f64,
    positions: &[BodyPosition],
) -> Array2<u8> {
    let mut canvas = size.empty_canvas();
    for body in positions {
        let level = match body.id {
            BodyId::Planet(_) => PLANET_LEVEL,
            BodyId::Moon(_) => MOON_LEVEL,
        };
        fill_disk(
            &mut canvas,
            body.position.x,
            body.position.y,
            body.radius,
            level,
        );
    }

    let center = size.center();
    fill_disk(&mut canvas, center.x, center.y, star_radius, STAR_LEVEL);
    canvas
}
