//! Canvas dimensions for the orbit and transit views

use nalgebra::Vector2;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas dimensions
///
/// Both rendered views and the rasterised transit projection share this
/// layout. Arrays are row-major with shape (height, width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Canvas width in pixels
    pub width: usize,
    /// Canvas height in pixels
    pub height: usize,
}

impl CanvasSize {
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// A black canvas of this size.
    pub fn empty_canvas(&self) -> Array2<u8> {
        Array2::zeros((self.height, self.width))
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Pixel coordinate of the canvas centre, on the integer grid.
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::from_width_height(900, 900)
    }
}

impl From<(usize, usize)> for CanvasSize {
    fn from(dimensions: (usize, usize)) -> Self {
        Self::from_width_height(dimensions.0, dimensions.1)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_canvas_shape() {
        let size = CanvasSize::from_width_height(40, 30);
        let canvas = size.empty_canvas();
        assert_eq!(canvas.dim(), (30, 40));
        assert_eq!(size.pixel_count(), 1200);
        assert!(canvas.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_center_uses_integer_grid() {
        let size = CanvasSize::from((901, 900));
        assert_eq!(size.center(), Vector2::new(450.0, 450.0));
        assert_eq!(size.to_string(), "901x900");
    }
}
