//! Simulation configuration.
//!
//! A run is fully described by a [`SimulationConfig`]: the frame schedule,
//! the star, the projection canvas, the gravitational constants and the
//! ordered list of bodies. Configurations are plain JSON documents; any field
//! left out takes its value from [`SimulationConfig::default`], which is the
//! two-planet, two-moon demonstration system.
//!
//! ```json
//! {
//!   "frames": 450,
//!   "bodies": [
//!     { "name": "a", "apoapsis": 200.0, "radius": 15.0 },
//!     { "name": "a-i", "apoapsis": 25.0, "radius": 1.0, "parent": "a" }
//!   ]
//! }
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::image_proc::CanvasSize;
use crate::orbit::{BodyId, OrbitError, OrbitalElements, OrbitalSystem};
use crate::photometry::{ProjectionMethod, Star, TransitProjector};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}

/// One planet or moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub apoapsis: f64,
    /// Defaults to `apoapsis` (circular orbit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periapsis: Option<f64>,
    /// Physical radius
    pub radius: f64,
    /// Argument of periapsis in radians, defaults to π/2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<f64>,
    /// Name of an earlier planet this body orbits; absent for planets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl BodyConfig {
    pub fn planet(name: &str, apoapsis: f64, radius: f64) -> Self {
        Self {
            name: name.to_string(),
            apoapsis,
            periapsis: None,
            radius,
            argument: None,
            parent: None,
        }
    }

    pub fn moon(name: &str, apoapsis: f64, radius: f64, parent: &str) -> Self {
        Self {
            parent: Some(parent.to_string()),
            ..Self::planet(name, apoapsis, radius)
        }
    }

    pub fn elements(&self) -> Result<OrbitalElements, OrbitError> {
        OrbitalElements::with_defaults(self.apoapsis, self.periapsis, self.argument)
    }
}

/// Everything needed to set up and run a transit simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to simulate
    pub frames: usize,
    /// Time step per frame
    pub dt: f64,
    /// Radius of the central star
    pub star_radius: f64,
    /// Magnification of the transit view relative to the orbit view
    pub scale: f64,
    /// Size of both the orbit view and the transit projection
    pub canvas: CanvasSize,
    pub gravitational_constant: f64,
    /// Mass of the central star
    pub central_mass: f64,
    /// Proportionality between a planet's cubed radius and the mass its
    /// moons orbit
    pub moon_mass_coefficient: f64,
    pub method: ProjectionMethod,
    /// Planets and moons in processing order
    pub bodies: Vec<BodyConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 450,
            dt: 1.0,
            star_radius: 100.0,
            scale: 2.0,
            canvas: CanvasSize::default(),
            gravitational_constant: 1.0,
            central_mass: 10_000.0,
            moon_mass_coefficient: 0.05,
            method: ProjectionMethod::Raster,
            bodies: vec![
                BodyConfig::planet("a", 200.0, 15.0),
                BodyConfig::planet("b", 120.0, 5.0),
                BodyConfig::moon("c", 25.0, 1.0, "a"),
                BodyConfig::moon("d", 15.0, 5.0, "a"),
            ],
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        info!(
            "Loaded config from {} ({} bodies, {} frames)",
            path.display(),
            config.bodies.len(),
            config.frames
        );
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `G·M` of the central star.
    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_constant * self.central_mass
    }

    /// Check the run-level constants. Bodies are checked by
    /// [`build_system`](Self::build_system).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.star_radius.is_finite() && self.star_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "star radius must be positive, got {}",
                self.star_radius
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "projection scale must be positive, got {}",
                self.scale
            )));
        }
        if self.canvas.pixel_count() == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas {} has no pixels",
                self.canvas
            )));
        }

        let center = self.canvas.center();
        let projected_star = self.star_radius * self.scale;
        if projected_star > center.x.min(center.y) {
            warn!(
                "Projected star radius {projected_star} overflows the {} canvas",
                self.canvas
            );
        }
        Ok(())
    }

    /// Build the orbital system, registering bodies in configuration order.
    ///
    /// # Errors
    /// [`OrbitError::InvalidOrbit`] for bad orbital elements and
    /// [`OrbitError::InvalidParent`] when a moon names an unknown, later or
    /// moon parent.
    pub fn build_system(&self) -> Result<OrbitalSystem, ConfigError> {
        self.validate()?;
        let mut system =
            OrbitalSystem::new(self.gravitational_parameter(), self.moon_mass_coefficient);
        let mut ids: HashMap<&str, BodyId> = HashMap::new();

        for body in &self.bodies {
            let elements = body.elements()?;
            let id = match &body.parent {
                None => system.add_planet(body.name.as_str(), elements, body.radius)?,
                Some(parent_name) => {
                    let parent = *ids.get(parent_name.as_str()).ok_or_else(|| {
                        OrbitError::InvalidParent(format!(
                            "moon '{}' names unknown parent '{}'",
                            body.name, parent_name
                        ))
                    })?;
                    if let Some(host) = system.body(parent) {
                        if elements.periapsis() < host.radius() {
                            warn!(
                                "Moon '{}' dips inside its parent '{}'",
                                body.name, parent_name
                            );
                        }
                    }
                    system.add_moon(body.name.as_str(), elements, body.radius, parent)?
                }
            };

            if ids.insert(body.name.as_str(), id).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "duplicate body name '{}'",
                    body.name
                )));
            }
        }

        info!(
            "Built system with {} planets and {} moons",
            system.planets().len(),
            system.moons().len()
        );
        Ok(system)
    }

    pub fn star(&self) -> Star {
        Star::new(self.star_radius)
    }

    pub fn projector(&self) -> TransitProjector {
        TransitProjector::new(self.canvas, self.scale, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_system() {
        let config = SimulationConfig::default();
        let system = config.build_system().unwrap();
        assert_eq!(system.planets().len(), 2);
        assert_eq!(system.moons().len(), 2);
        assert_eq!(system.moons()[1].parent(), Some(BodyId::Planet(0)));
        assert_eq!(system.planets()[0].rate_constant(), 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{ "frames": 3, "method": "analytic",
                 "bodies": [{ "name": "x", "apoapsis": 90.0, "periapsis": 60.0, "radius": 4.0 }] }"#,
        )
        .unwrap();
        assert_eq!(config.frames, 3);
        assert_eq!(config.dt, 1.0);
        assert_eq!(config.method, ProjectionMethod::Analytic);
        assert_eq!(config.bodies.len(), 1);
        assert_eq!(config.bodies[0].periapsis, Some(60.0));
        assert_eq!(config.canvas, CanvasSize::from_width_height(900, 900));
    }

    #[test]
    fn test_unknown_parent() {
        let config = SimulationConfig {
            bodies: vec![BodyConfig::moon("m", 10.0, 1.0, "nobody")],
            ..Default::default()
        };
        assert!(matches!(
            config.build_system(),
            Err(ConfigError::Orbit(OrbitError::InvalidParent(_)))
        ));
    }

    #[test]
    fn test_parent_must_come_first() {
        let config = SimulationConfig {
            bodies: vec![
                BodyConfig::moon("m", 10.0, 1.0, "p"),
                BodyConfig::planet("p", 100.0, 5.0),
            ],
            ..Default::default()
        };
        assert!(config.build_system().is_err());
    }

    #[test]
    fn test_moon_of_moon_rejected() {
        let config = SimulationConfig {
            bodies: vec![
                BodyConfig::planet("p", 100.0, 5.0),
                BodyConfig::moon("m", 10.0, 1.0, "p"),
                BodyConfig::moon("mm", 3.0, 0.5, "m"),
            ],
            ..Default::default()
        };
        assert!(matches!(
            config.build_system(),
            Err(ConfigError::Orbit(OrbitError::InvalidParent(_)))
        ));
    }

    #[test]
    fn test_invalid_orbit_and_duplicates() {
        let mut bad = BodyConfig::planet("p", 100.0, 5.0);
        bad.periapsis = Some(150.0);
        let config = SimulationConfig {
            bodies: vec![bad],
            ..Default::default()
        };
        assert!(matches!(
            config.build_system(),
            Err(ConfigError::Orbit(OrbitError::InvalidOrbit(_)))
        ));

        let config = SimulationConfig {
            bodies: vec![
                BodyConfig::planet("p", 100.0, 5.0),
                BodyConfig::planet("p", 120.0, 5.0),
            ],
            ..Default::default()
        };
        assert!(matches!(
            config.build_system(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_run_constants_validated() {
        let config = SimulationConfig {
            dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SimulationConfig {
            canvas: CanvasSize::from_width_height(0, 10),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.json");
        let config = SimulationConfig {
            frames: 12,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(SimulationConfig::load_from_file(&path).unwrap(), config);

        assert!(matches!(
            SimulationConfig::load_from_file(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
