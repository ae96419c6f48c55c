//! Transit projection: from the set of near-side bodies to a frame intensity.
//!
//! The observer sees a 1-D sightline: the star is a filled disk of radius
//! `star_radius · scale` at the centre of the projection canvas, and every
//! transiting body casts a same-scaled black disk centred on its projected
//! coordinate along the canvas mid-line. The frame intensity is the mean
//! pixel value over the whole canvas, background included.
//!
//! Two methods compute it:
//!
//! - [`ProjectionMethod::Raster`] draws the disks and averages the pixels.
//!   Overlapping shadows are covered once and shadows spilling off the star
//!   only darken background, so coverage is capped rather than summed.
//! - [`ProjectionMethod::Analytic`] subtracts the exact area of the star
//!   covered by the union of all shadows. Like the raster method it covers
//!   overlapping shadows once and drops whatever falls past the limb, so the
//!   two agree up to pixelisation while the star stays on the canvas.
//!
//! Absolute intensity depends on canvas size and is normalised away by the
//! [`LightCurveRecorder`](super::LightCurveRecorder).

use log::debug;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::algo::misc::{circle_area, occluded_area};
use crate::image_proc::render::{fill_disk, mean_intensity, STAR_LEVEL};
use crate::image_proc::CanvasSize;
use crate::orbit::{Sightline, TransitingBody};

/// The central star as seen by the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Stellar radius in orbital distance units
    pub radius: f64,
}

impl Star {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

/// How a frame's intensity is obtained from its shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMethod {
    /// Draw the side view and average its pixels
    #[default]
    Raster,
    /// Closed-form clipped-area formula
    Analytic,
}

/// Converts the transiting set of a frame into a scalar intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitProjector {
    canvas: CanvasSize,
    scale: f64,
    method: ProjectionMethod,
}

impl TransitProjector {
    /// Create a projector drawing on `canvas`, magnifying orbital distances
    /// and radii by `scale`.
    pub fn new(canvas: CanvasSize, scale: f64, method: ProjectionMethod) -> Self {
        Self {
            canvas,
            scale,
            method,
        }
    }

    pub fn canvas(&self) -> &CanvasSize {
        &self.canvas
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn method(&self) -> ProjectionMethod {
        self.method
    }

    /// The sightline bodies must be projected onto for this projector.
    pub fn sightline(&self) -> Sightline {
        Sightline::new(self.canvas.center().x, self.scale)
    }

    /// Mean observed brightness of the frame.
    ///
    /// # Arguments
    /// * `star` - The star being occulted
    /// * `transiting` - Near-side bodies projected through
    ///   [`sightline`](Self::sightline)
    ///
    /// # Returns
    /// Mean pixel value over the canvas, in `[0, 255]`
    pub fn compute_intensity(&self, star: &Star, transiting: &[TransitingBody]) -> f64 {
        let intensity = match self.method {
            ProjectionMethod::Raster => mean_intensity(&self.render(star, transiting)),
            ProjectionMethod::Analytic => self.analytic_intensity(star, transiting),
        };
        debug!(
            "{:?} intensity {:.6} with {} shadows",
            self.method,
            intensity,
            transiting.len()
        );
        intensity
    }

    /// Draw the side view: the star disk with every shadow cut out of it.
    pub fn render(&self, star: &Star, transiting: &[TransitingBody]) -> Array2<u8> {
        let mut canvas = self.canvas.empty_canvas();
        let center = self.canvas.center();
        fill_disk(
            &mut canvas,
            center.x,
            center.y,
            star.radius * self.scale,
            STAR_LEVEL,
        );
        for body in transiting {
            fill_disk(&mut canvas, body.x, center.y, body.radius * self.scale, 0);
        }
        canvas
    }

    fn analytic_intensity(&self, star: &Star, transiting: &[TransitingBody]) -> f64 {
        let pixel_count = self.canvas.pixel_count();
        if pixel_count == 0 {
            return 0.0;
        }

        let star_radius = star.radius * self.scale;
        let shadows: Vec<(f64, f64)> = transiting
            .iter()
            .map(|body| (body.x, body.radius * self.scale))
            .collect();
        let occluded = occluded_area(self.canvas.center().x, star_radius, &shadows);

        let lit = (circle_area(star_radius) - occluded).max(0.0);
        f64::from(STAR_LEVEL) * lit / pixel_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::BodyId;
    use approx::assert_relative_eq;

    fn projector(method: ProjectionMethod) -> TransitProjector {
        TransitProjector::new(CanvasSize::from_width_height(900, 900), 2.0, method)
    }

    fn shadow(index: usize, x: f64, radius: f64) -> TransitingBody {
        TransitingBody {
            id: BodyId::Planet(index),
            x,
            radius,
        }
    }

    #[test]
    fn test_sightline_centered_on_canvas() {
        let sightline = projector(ProjectionMethod::Raster).sightline();
        assert_eq!(sightline.center_x, 450.0);
        assert_eq!(sightline.scale, 2.0);
    }

    #[test]
    fn test_unoccluded_methods_agree() {
        let star = Star::new(100.0);
        let raster = projector(ProjectionMethod::Raster).compute_intensity(&star, &[]);
        let analytic = projector(ProjectionMethod::Analytic).compute_intensity(&star, &[]);

        let expected = 255.0 * circle_area(200.0) / 810_000.0;
        assert_relative_eq!(analytic, expected, max_relative = 1e-12);
        assert_relative_eq!(raster, expected, max_relative = 5e-3);
    }

    #[test]
    fn test_shadow_reduces_intensity() {
        let star = Star::new(100.0);
        let raster = projector(ProjectionMethod::Raster);
        let clear = raster.compute_intensity(&star, &[]);
        let shaded = raster.compute_intensity(&star, &[shadow(0, 450.0, 15.0)]);
        assert!(shaded < clear);

        let lost = (clear - shaded) * 810_000.0 / 255.0;
        assert_relative_eq!(lost, circle_area(30.0), max_relative = 2e-2);
    }

    #[test]
    fn test_methods_agree_for_separate_shadows() {
        let star = Star::new(100.0);
        // One shadow fully on the disk, one straddling the limb
        let shadows = [shadow(0, 380.0, 15.0), shadow(1, 640.0, 10.0)];
        let raster = projector(ProjectionMethod::Raster).compute_intensity(&star, &shadows);
        let analytic = projector(ProjectionMethod::Analytic).compute_intensity(&star, &shadows);
        assert_relative_eq!(raster, analytic, max_relative = 5e-3);
    }

    #[test]
    fn test_shadow_off_the_star_changes_nothing() {
        let star = Star::new(100.0);
        for method in [ProjectionMethod::Raster, ProjectionMethod::Analytic] {
            let p = projector(method);
            let clear = p.compute_intensity(&star, &[]);
            let outside = p.compute_intensity(&star, &[shadow(0, 800.0, 15.0)]);
            assert_eq!(clear, outside);
        }
    }

    #[test]
    fn test_overlapping_shadows_are_capped() {
        let star = Star::new(100.0);
        let single = [shadow(0, 450.0, 15.0)];
        let doubled = [shadow(0, 450.0, 15.0), shadow(1, 450.0, 15.0)];
        for method in [ProjectionMethod::Raster, ProjectionMethod::Analytic] {
            let p = projector(method);
            assert_eq!(
                p.compute_intensity(&star, &single),
                p.compute_intensity(&star, &doubled),
                "{method:?}"
            );
        }
    }

    #[test]
    fn test_moon_inside_parent_shadow_adds_nothing() {
        let star = Star::new(100.0);
        let planet = shadow(0, 450.0, 15.0);
        let moon = TransitingBody {
            id: BodyId::Moon(0),
            x: 455.0,
            radius: 5.0,
        };
        for method in [ProjectionMethod::Raster, ProjectionMethod::Analytic] {
            let p = projector(method);
            assert_relative_eq!(
                p.compute_intensity(&star, &[planet]),
                p.compute_intensity(&star, &[planet, moon]),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_methods_agree_for_overlapping_shadows() {
        let star = Star::new(100.0);
        let moon = TransitingBody {
            id: BodyId::Moon(0),
            x: 480.0,
            radius: 8.0,
        };
        let cases = [
            vec![shadow(0, 450.0, 15.0), moon],
            // Overlapping pair straddling the limb
            vec![shadow(0, 640.0, 15.0), shadow(1, 665.0, 12.0)],
        ];
        for shadows in cases {
            let raster = projector(ProjectionMethod::Raster).compute_intensity(&star, &shadows);
            let analytic =
                projector(ProjectionMethod::Analytic).compute_intensity(&star, &shadows);
            assert_relative_eq!(raster, analytic, max_relative = 5e-3);
        }
    }

    #[test]
    fn test_giant_shadow_leaves_only_background() {
        let star = Star::new(100.0);
        let shadows = [shadow(0, 450.0, 150.0)];
        for method in [ProjectionMethod::Raster, ProjectionMethod::Analytic] {
            assert_eq!(projector(method).compute_intensity(&star, &shadows), 0.0);
        }
    }

    #[test]
    fn test_render_layout() {
        let star = Star::new(100.0);
        let canvas = projector(ProjectionMethod::Raster).render(&star, &[shadow(0, 450.0, 15.0)]);
        assert_eq!(canvas.dim(), (900, 900));
        assert_eq!(canvas[[450, 450]], 0);
        assert_eq!(canvas[[450, 600]], STAR_LEVEL);
        assert_eq!(canvas[[0, 0]], 0);
    }
}
