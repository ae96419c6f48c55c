//! Keplerian orbital bodies.
//!
//! A body follows a closed-form conic orbit around its primary. Nothing here
//! integrates forces: every step advances the orbital angle at a rate set by
//! the body's rate constant `K` and the current radius, then re-evaluates the
//! polar conic equation for the new radius.
//!
//! # Orbit model
//!
//! ```text
//! angle -= dt * K / r^1.5
//! r      = a (1 - e²) / (1 + e cos(angle + ω))
//! ```
//!
//! where `a = (apoapsis + periapsis) / 2`, `e = (apoapsis - periapsis) / (apoapsis + periapsis)`
//! and `ω` is the argument of periapsis. Since `r` is a pure function of the
//! angle it always stays within `[periapsis, apoapsis]`.
//!
//! # Examples
//!
//! ```rust
//! use transit_simulator::orbit::{OrbitalBody, OrbitalElements};
//!
//! let elements = OrbitalElements::circular(200.0).unwrap();
//! let mut planet = OrbitalBody::planet("b", elements, 15.0, 10_000.0).unwrap();
//!
//! planet.advance(1.0);
//! assert!((planet.orbital_radius() - 200.0).abs() < 1e-9);
//! ```

use nalgebra::Vector2;
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Argument of periapsis used when none is given (90°).
///
/// With the observer looking along +y this starts every body at the point of
/// its orbit closest to the observer's side.
pub const DEFAULT_ARGUMENT: f64 = FRAC_PI_2;

/// Errors raised while constructing bodies or registering them in a system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),
    #[error("Invalid parent: {0}")]
    InvalidParent(String),
}

/// Handle to a body registered in an [`OrbitalSystem`](super::OrbitalSystem).
///
/// Planets orbit the central star, moons orbit a planet. The index is the
/// insertion position within the respective collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Planet(usize),
    Moon(usize),
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyId::Planet(index) => write!(f, "planet #{index}"),
            BodyId::Moon(index) => write!(f, "moon #{index}"),
        }
    }
}

/// Near-side predicate on a line-of-sight depth. Zero is far side.
pub fn faces_observer(depth: f64) -> bool {
    depth > 0.0
}

/// Shape and orientation of a conic orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    apoapsis: f64,
    periapsis: f64,
    eccentricity: f64,
    argument: f64,
}

impl OrbitalElements {
    /// Create orbital elements from apsis distances and argument of periapsis.
    ///
    /// # Errors
    /// [`OrbitError::InvalidOrbit`] if either distance is non-positive or
    /// non-finite, if `periapsis > apoapsis`, or if the resulting eccentricity
    /// is not below 1.
    pub fn new(apoapsis: f64, periapsis: f64, argument: f64) -> Result<Self, OrbitError> {
        if !apoapsis.is_finite() || !periapsis.is_finite() || !argument.is_finite() {
            return Err(OrbitError::InvalidOrbit(format!(
                "non-finite elements (apoapsis={apoapsis}, periapsis={periapsis}, argument={argument})"
            )));
        }
        if apoapsis <= 0.0 || periapsis <= 0.0 {
            return Err(OrbitError::InvalidOrbit(format!(
                "apsis distances must be positive (apoapsis={apoapsis}, periapsis={periapsis})"
            )));
        }
        if periapsis > apoapsis {
            return Err(OrbitError::InvalidOrbit(format!(
                "periapsis {periapsis} exceeds apoapsis {apoapsis}"
            )));
        }

        let eccentricity = (apoapsis - periapsis) / (apoapsis + periapsis);
        if eccentricity >= 1.0 {
            return Err(OrbitError::InvalidOrbit(format!(
                "eccentricity {eccentricity} is not below 1"
            )));
        }

        Ok(Self {
            apoapsis,
            periapsis,
            eccentricity,
            argument,
        })
    }

    /// Circular orbit at `distance` with the default argument.
    pub fn circular(distance: f64) -> Result<Self, OrbitError> {
        Self::new(distance, distance, DEFAULT_ARGUMENT)
    }

    /// Elements with periapsis defaulting to apoapsis and argument defaulting
    /// to [`DEFAULT_ARGUMENT`].
    pub fn with_defaults(
        apoapsis: f64,
        periapsis: Option<f64>,
        argument: Option<f64>,
    ) -> Result<Self, OrbitError> {
        Self::new(
            apoapsis,
            periapsis.unwrap_or(apoapsis),
            argument.unwrap_or(DEFAULT_ARGUMENT),
        )
    }

    pub fn apoapsis(&self) -> f64 {
        self.apoapsis
    }

    pub fn periapsis(&self) -> f64 {
        self.periapsis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn argument(&self) -> f64 {
        self.argument
    }

    pub fn semi_major_axis(&self) -> f64 {
        0.5 * (self.apoapsis + self.periapsis)
    }

    /// Orbital radius at `angle` from the polar conic equation.
    pub fn radius_at(&self, angle: f64) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis() * (1.0 - e * e) / (1.0 + e * (angle + self.argument).cos())
    }
}

/// A planet or moon on a Keplerian orbit.
///
/// A body with a parent is a moon; its offset is measured from the parent
/// rather than from the star, and its phase ignores its own argument of
/// periapsis when placed around the parent.
#[derive(Debug, Clone)]
pub struct OrbitalBody {
    name: String,
    elements: OrbitalElements,
    radius: f64,
    parent: Option<BodyId>,
    rate_constant: f64,
    angle: f64,
    orbital_radius: f64,
}

impl OrbitalBody {
    /// Create a body orbiting the central star.
    ///
    /// `gravitational_parameter` is `G·M` of the star; the rate constant is its
    /// square root.
    pub fn planet(
        name: impl Into<String>,
        elements: OrbitalElements,
        radius: f64,
        gravitational_parameter: f64,
    ) -> Result<Self, OrbitError> {
        if !(gravitational_parameter.is_finite() && gravitational_parameter > 0.0) {
            return Err(OrbitError::InvalidOrbit(format!(
                "gravitational parameter must be positive, got {gravitational_parameter}"
            )));
        }
        Self::new(name, elements, radius, None, gravitational_parameter.sqrt())
    }

    /// Create a moon orbiting `parent`.
    ///
    /// The system tracks no planet masses, so the parent's mass is stood in
    /// for by `mass_coefficient · parent_radius³` and the rate constant is
    /// `sqrt(mass_coefficient · parent_radius³)`.
    pub fn moon(
        name: impl Into<String>,
        elements: OrbitalElements,
        radius: f64,
        parent: BodyId,
        parent_radius: f64,
        mass_coefficient: f64,
    ) -> Result<Self, OrbitError> {
        if !(parent_radius.is_finite() && parent_radius > 0.0) {
            return Err(OrbitError::InvalidParent(format!(
                "{parent} has non-positive radius {parent_radius}"
            )));
        }
        if !(mass_coefficient.is_finite() && mass_coefficient > 0.0) {
            return Err(OrbitError::InvalidOrbit(format!(
                "moon mass coefficient must be positive, got {mass_coefficient}"
            )));
        }
        let rate_constant = (mass_coefficient * parent_radius.powi(3)).sqrt();
        Self::new(name, elements, radius, Some(parent), rate_constant)
    }

    fn new(
        name: impl Into<String>,
        elements: OrbitalElements,
        radius: f64,
        parent: Option<BodyId>,
        rate_constant: f64,
    ) -> Result<Self, OrbitError> {
        let name = name.into();
        if !(radius.is_finite() && radius > 0.0) {
            return Err(OrbitError::InvalidOrbit(format!(
                "body '{name}' must have a positive radius, got {radius}"
            )));
        }

        Ok(Self {
            name,
            elements,
            radius,
            parent,
            rate_constant,
            angle: 0.0,
            orbital_radius: elements.periapsis(),
        })
    }

    /// Advance the body by one time step.
    ///
    /// The angle moves first using the radius of the previous step, then the
    /// radius is re-evaluated at the new angle.
    pub fn advance(&mut self, dt: f64) {
        self.angle -= dt * self.rate_constant / self.orbital_radius.powf(1.5);
        self.orbital_radius = self.elements.radius_at(self.angle);
    }

    /// Phase used to place the body around its primary.
    fn placement_phase(&self) -> f64 {
        match self.parent {
            Some(_) => self.angle,
            None => self.angle + self.elements.argument(),
        }
    }

    /// Offset from the primary in the orbital plane.
    ///
    /// `x` runs across the observer's view, `y` along the line of sight
    /// towards the observer.
    pub fn local_offset(&self) -> Vector2<f64> {
        let phase = self.placement_phase();
        Vector2::new(
            self.orbital_radius * phase.sin(),
            self.orbital_radius * phase.cos(),
        )
    }

    /// Line-of-sight coordinate `r·cos(angle + argument)` of the body on its
    /// own orbit.
    ///
    /// Whether a body may transit is decided by
    /// [`OrbitalSystem::is_near_side`](super::OrbitalSystem::is_near_side),
    /// which looks at the parent's depth for moons.
    pub fn sightline_depth(&self) -> f64 {
        self.orbital_radius * (self.angle + self.elements.argument()).cos()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Physical radius used for occlusion.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn is_moon(&self) -> bool {
        self.parent.is_some()
    }

    pub fn rate_constant(&self) -> f64 {
        self.rate_constant
    }

    /// Current orbital angle in radians. Decreases every step.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Current distance from the primary.
    pub fn orbital_radius(&self) -> f64 {
        self.orbital_radius
    }

    /// Place the body at `angle`, recomputing its radius.
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.orbital_radius = self.elements.radius_at(angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    const GM: f64 = 10_000.0;

    #[test]
    fn test_eccentricity_from_apsides() {
        let elements = OrbitalElements::new(300.0, 100.0, 0.0).unwrap();
        assert_relative_eq!(elements.eccentricity(), 0.5);
        assert_relative_eq!(elements.semi_major_axis(), 200.0);
    }

    #[test]
    fn test_defaults_are_circular_at_ninety_degrees() {
        let elements = OrbitalElements::with_defaults(120.0, None, None).unwrap();
        assert_eq!(elements.periapsis(), 120.0);
        assert_eq!(elements.eccentricity(), 0.0);
        assert_eq!(elements.argument(), DEFAULT_ARGUMENT);
    }

    #[test]
    fn test_rejects_invalid_apsides() {
        assert!(matches!(
            OrbitalElements::new(100.0, 200.0, 0.0),
            Err(OrbitError::InvalidOrbit(_))
        ));
        assert!(matches!(
            OrbitalElements::new(0.0, 0.0, 0.0),
            Err(OrbitError::InvalidOrbit(_))
        ));
        assert!(matches!(
            OrbitalElements::new(100.0, -5.0, 0.0),
            Err(OrbitError::InvalidOrbit(_))
        ));
        assert!(matches!(
            OrbitalElements::new(f64::NAN, 10.0, 0.0),
            Err(OrbitError::InvalidOrbit(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let elements = OrbitalElements::circular(100.0).unwrap();
        assert!(OrbitalBody::planet("p", elements, 0.0, GM).is_err());
        assert!(OrbitalBody::planet("p", elements, 5.0, 0.0).is_err());
    }

    #[test]
    fn test_radius_at_apsides() {
        let elements = OrbitalElements::new(300.0, 100.0, 0.0).unwrap();
        assert_relative_eq!(elements.radius_at(0.0), 100.0, epsilon = 1e-9);
        assert_relative_eq!(elements.radius_at(PI), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_step_of_circular_planet() {
        let elements = OrbitalElements::circular(200.0).unwrap();
        let mut planet = OrbitalBody::planet("a", elements, 15.0, GM).unwrap();
        let k = planet.rate_constant();
        assert_relative_eq!(k, 100.0);

        planet.advance(1.0);

        assert_relative_eq!(planet.angle(), -k / 200.0_f64.powf(1.5), epsilon = 1e-12);
        assert_relative_eq!(planet.orbital_radius(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circular_radius_is_constant() {
        let elements = OrbitalElements::circular(120.0).unwrap();
        let mut planet = OrbitalBody::planet("b", elements, 5.0, GM).unwrap();
        for _ in 0..5_000 {
            planet.advance(1.0);
            assert_relative_eq!(planet.orbital_radius(), 120.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_radius_stays_within_apsides() {
        let elements = OrbitalElements::new(250.0, 80.0, 0.3).unwrap();
        let mut planet = OrbitalBody::planet("c", elements, 4.0, GM).unwrap();
        for _ in 0..20_000 {
            planet.advance(0.5);
            let r = planet.orbital_radius();
            assert!(r >= 80.0 - 1e-9 && r <= 250.0 + 1e-9, "radius {r} escaped");
        }
    }

    #[test]
    fn test_radius_is_periodic_in_angle() {
        let elements = OrbitalElements::new(250.0, 80.0, 1.1).unwrap();
        for i in 0..32 {
            let angle = -(i as f64) * 0.37;
            assert_relative_eq!(
                elements.radius_at(angle),
                elements.radius_at(angle - TAU),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_radius_returns_after_full_revolution() {
        let elements = OrbitalElements::new(250.0, 80.0, 0.0).unwrap();
        let mut planet = OrbitalBody::planet("d", elements, 4.0, GM).unwrap();
        planet.advance(1.0);
        let start_angle = planet.angle();
        let start_radius = planet.orbital_radius();

        planet.set_angle(start_angle - TAU);
        assert_relative_eq!(planet.orbital_radius(), start_radius, epsilon = 1e-9);
    }

    #[test]
    fn test_near_side_tie_break_is_far_side() {
        assert!(!faces_observer(0.0));
        assert!(!faces_observer(-0.0));
        assert!(faces_observer(1e-300));
        assert!(!faces_observer(-1e-300));
    }

    #[test]
    fn test_near_and_far_side_are_exclusive() {
        let elements = OrbitalElements::new(100.0, 100.0, 0.0).unwrap();
        let mut planet = OrbitalBody::planet("e", elements, 1.0, GM).unwrap();

        planet.set_angle(0.0);
        assert!(faces_observer(planet.sightline_depth()));
        planet.set_angle(PI);
        assert!(!faces_observer(planet.sightline_depth()));

        for i in 0..64 {
            planet.set_angle(-(i as f64) * 0.1 - 0.05);
            let depth = planet.sightline_depth();
            assert_eq!(faces_observer(depth), depth > 0.0);
            assert_ne!(faces_observer(depth), depth < 0.0);
        }
    }

    #[test]
    fn test_moon_rate_constant_uses_parent_radius() {
        let elements = OrbitalElements::circular(25.0).unwrap();
        let moon = OrbitalBody::moon("m", elements, 1.0, BodyId::Planet(0), 15.0, 0.05).unwrap();
        assert_relative_eq!(moon.rate_constant(), (0.05 * 15.0_f64.powi(3)).sqrt());
        assert!(moon.is_moon());
        assert_eq!(moon.parent(), Some(BodyId::Planet(0)));
    }

    #[test]
    fn test_moon_offset_ignores_argument() {
        let elements = OrbitalElements::new(25.0, 25.0, 1.0).unwrap();
        let mut moon = OrbitalBody::moon("m", elements, 1.0, BodyId::Planet(0), 15.0, 0.05).unwrap();
        moon.set_angle(0.4);
        let offset = moon.local_offset();
        assert_relative_eq!(offset.x, 25.0 * 0.4_f64.sin(), epsilon = 1e-9);
        assert_relative_eq!(offset.y, 25.0 * 0.4_f64.cos(), epsilon = 1e-9);
    }
}
