//! Ownership and stepping of every body in a star system.

use log::debug;
use nalgebra::Vector2;

use super::body::{faces_observer, BodyId, OrbitError, OrbitalBody, OrbitalElements};

/// Mapping from orbital-plane offsets onto the observer's 1-D sightline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sightline {
    /// Coordinate of the star's centre on the projection canvas
    pub center_x: f64,
    /// Pixels per orbital distance unit on the projection canvas
    pub scale: f64,
}

impl Sightline {
    pub fn new(center_x: f64, scale: f64) -> Self {
        Self { center_x, scale }
    }

    /// Project an offset from the star onto the sightline.
    pub fn project(&self, offset: &Vector2<f64>) -> f64 {
        self.center_x + offset.x * self.scale
    }
}

/// A body on the near side of its primary for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitingBody {
    pub id: BodyId,
    /// Projected sightline coordinate
    pub x: f64,
    /// Physical radius, unscaled
    pub radius: f64,
}

/// Position of a body on the top-down orbit view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub id: BodyId,
    pub position: Vector2<f64>,
    pub radius: f64,
}

/// Explicitly owned, ordered collections of planets and moons.
///
/// Bodies are registered through [`add_planet`](Self::add_planet) and
/// [`add_moon`](Self::add_moon). Insertion order is processing order: planets
/// step before moons and transiting sets list planets first.
#[derive(Debug, Clone)]
pub struct OrbitalSystem {
    gravitational_parameter: f64,
    moon_mass_coefficient: f64,
    planets: Vec<OrbitalBody>,
    moons: Vec<OrbitalBody>,
}

impl OrbitalSystem {
    /// Create an empty system around a star with `G·M = gravitational_parameter`.
    ///
    /// `moon_mass_coefficient` scales a parent's cubed radius into the proxy
    /// mass its moons orbit.
    pub fn new(gravitational_parameter: f64, moon_mass_coefficient: f64) -> Self {
        Self {
            gravitational_parameter,
            moon_mass_coefficient,
            planets: Vec::new(),
            moons: Vec::new(),
        }
    }

    /// Register a planet orbiting the star.
    ///
    /// The planet's rate constant is `sqrt(G·M)` of the system's star.
    ///
    /// # Arguments
    /// * `name` - Display name of the planet
    /// * `elements` - Orbit around the star
    /// * `radius` - Physical radius, used for occlusion
    ///
    /// # Returns
    /// The planet's id, [`BodyId::Planet`] with its insertion index
    ///
    /// # Errors
    /// [`OrbitError::InvalidOrbit`] for a non-positive radius or a
    /// non-positive gravitational parameter.
    pub fn add_planet(
        &mut self,
        name: impl Into<String>,
        elements: OrbitalElements,
        radius: f64,
    ) -> Result<BodyId, OrbitError> {
        let body = OrbitalBody::planet(name, elements, radius, self.gravitational_parameter)?;
        self.planets.push(body);
        Ok(BodyId::Planet(self.planets.len() - 1))
    }

    /// Register a moon orbiting the planet `parent`.
    ///
    /// # Arguments
    /// * `name` - Display name of the moon
    /// * `elements` - Orbit around the parent; the argument of periapsis only
    ///   shapes the radius, not the placement phase
    /// * `radius` - Physical radius, used for occlusion
    /// * `parent` - Id of an already registered planet
    ///
    /// # Errors
    /// [`OrbitError::InvalidParent`] if `parent` is a moon or not registered.
    pub fn add_moon(
        &mut self,
        name: impl Into<String>,
        elements: OrbitalElements,
        radius: f64,
        parent: BodyId,
    ) -> Result<BodyId, OrbitError> {
        let parent_radius = match parent {
            BodyId::Planet(index) => self
                .planets
                .get(index)
                .map(OrbitalBody::radius)
                .ok_or_else(|| {
                    OrbitError::InvalidParent(format!("{parent} is not registered"))
                })?,
            BodyId::Moon(_) => {
                return Err(OrbitError::InvalidParent(format!(
                    "{parent} cannot host moons"
                )))
            }
        };

        let body = OrbitalBody::moon(
            name,
            elements,
            radius,
            parent,
            parent_radius,
            self.moon_mass_coefficient,
        )?;
        self.moons.push(body);
        Ok(BodyId::Moon(self.moons.len() - 1))
    }

    /// Advance every planet, then every moon, by `dt`.
    pub fn step_all(&mut self, dt: f64) {
        for body in self.planets.iter_mut().chain(self.moons.iter_mut()) {
            body.advance(dt);
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitalBody> {
        match id {
            BodyId::Planet(index) => self.planets.get(index),
            BodyId::Moon(index) => self.moons.get(index),
        }
    }

    /// Mutable access for placing a body by hand, e.g. with
    /// [`OrbitalBody::set_angle`].
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut OrbitalBody> {
        match id {
            BodyId::Planet(index) => self.planets.get_mut(index),
            BodyId::Moon(index) => self.moons.get_mut(index),
        }
    }

    pub fn planets(&self) -> &[OrbitalBody] {
        &self.planets
    }

    pub fn moons(&self) -> &[OrbitalBody] {
        &self.moons
    }

    /// Planets followed by moons, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &OrbitalBody)> {
        let planets = self
            .planets
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyId::Planet(i), b));
        let moons = self
            .moons
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyId::Moon(i), b));
        planets.chain(moons)
    }

    pub fn len(&self) -> usize {
        self.planets.len() + self.moons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }

    pub fn moon_mass_coefficient(&self) -> f64 {
        self.moon_mass_coefficient
    }

    /// The primary a body's offset is measured from, if it is a moon.
    fn parent_of(&self, body: &OrbitalBody) -> Option<&OrbitalBody> {
        body.parent().and_then(|id| self.body(id))
    }

    /// Offset of a body from the star in the orbital plane.
    fn offset_from_star(&self, body: &OrbitalBody) -> Vector2<f64> {
        match self.parent_of(body) {
            Some(parent) => parent.local_offset() + body.local_offset(),
            None => body.local_offset(),
        }
    }

    /// Whether the body may transit this frame.
    ///
    /// Moons inherit the answer from their parent regardless of their own
    /// phase.
    fn eligible_for_transit(&self, body: &OrbitalBody) -> bool {
        match self.parent_of(body) {
            Some(parent) => faces_observer(parent.sightline_depth()),
            None => faces_observer(body.sightline_depth()),
        }
    }

    /// Whether the body is on the observer's side of the star this frame.
    ///
    /// A planet is near side when its own line-of-sight depth is positive;
    /// a depth of exactly zero counts as far side. A moon follows its parent
    /// planet's depth, whatever its own phase.
    ///
    /// # Returns
    /// `None` if `id` is not registered
    pub fn is_near_side(&self, id: BodyId) -> Option<bool> {
        self.body(id).map(|body| self.eligible_for_transit(body))
    }

    /// Bodies currently on the near side, planets first, each with its
    /// projected sightline coordinate.
    ///
    /// # Arguments
    /// * `sightline` - Projection of star-relative offsets onto the canvas
    ///
    /// # Returns
    /// One [`TransitingBody`] per body for which
    /// [`is_near_side`](Self::is_near_side) holds, radii left unscaled
    pub fn collect_transiting(&self, sightline: &Sightline) -> Vec<TransitingBody> {
        let transiting: Vec<TransitingBody> = self
            .iter()
            .filter(|(_, body)| self.eligible_for_transit(body))
            .map(|(id, body)| TransitingBody {
                id,
                x: sightline.project(&self.offset_from_star(body)),
                radius: body.radius(),
            })
            .collect();
        debug!(
            "{} of {} bodies on the near side",
            transiting.len(),
            self.len()
        );
        transiting
    }

    /// Top-down position of a body relative to a view centred on the star.
    pub fn position_on_sky(&self, id: BodyId, center: Vector2<f64>) -> Option<Vector2<f64>> {
        self.body(id)
            .map(|body| center + self.offset_from_star(body))
    }

    /// Top-down positions of every body, planets first.
    pub fn positions(&self, center: Vector2<f64>) -> Vec<BodyPosition> {
        self.iter()
            .map(|(id, body)| BodyPosition {
                id,
                position: center + self.offset_from_star(body),
                radius: body.radius(),
            })
            .collect()
    }
}
