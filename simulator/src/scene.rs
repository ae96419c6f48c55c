use crate::config::{ConfigError, SimulationConfig};
use crate::image_proc::render_orbit_view;
use crate::orbit::{BodyPosition, OrbitError, OrbitalSystem, TransitingBody};
use crate::photometry::{LightCurveError, LightCurveRecorder, Star, TransitProjector};
use log::{debug, info};
use ndarray::Array2;
use thiserror::Error;

/// Any failure while setting up or finishing a run.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error(transparent)]
    LightCurve(#[from] LightCurveError),
}

/// Read-only record of one simulated frame.
///
/// Renderers and plotters consume these; nothing in a snapshot refers back
/// into the live system.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Zero-based frame number
    pub index: usize,
    /// Top-down position of every body, planets first
    pub positions: Vec<BodyPosition>,
    /// Bodies on the near side with their sightline coordinates
    pub transiting: Vec<TransitingBody>,
    /// Mean observed brightness of the frame
    pub intensity: f64,
}

/// A star system together with the observer's projection and light curve
///
/// Each call to [`step`](Self::step) runs one frame in strict order: every
/// body advances, the near-side set is collected, its intensity computed and
/// recorded. After the last frame the recorder holds the raw curve.
///
/// # Example Usage
///
/// ```rust
/// use transit_simulator::{Scene, SimulationConfig};
///
/// let config = SimulationConfig {
///     frames: 20,
///     ..Default::default()
/// };
/// let mut scene = Scene::from_config(&config).unwrap();
/// let relative = scene.run().unwrap();
///
/// assert_eq!(relative.len(), 20);
/// assert!(relative.iter().all(|&b| b <= 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Scene {
    system: OrbitalSystem,
    projector: TransitProjector,
    star: Star,
    dt: f64,
    frames: usize,
    frame_index: usize,
    recorder: LightCurveRecorder,
}

impl Scene {
    pub fn new(
        system: OrbitalSystem,
        projector: TransitProjector,
        star: Star,
        dt: f64,
        frames: usize,
    ) -> Self {
        Self {
            system,
            projector,
            star,
            dt,
            frames,
            frame_index: 0,
            recorder: LightCurveRecorder::with_capacity(frames),
        }
    }

    /// Validate `config` and build the scene it describes.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let system = config.build_system()?;
        Ok(Self::new(
            system,
            config.projector(),
            config.star(),
            config.dt,
            config.frames,
        ))
    }

    /// Simulate the next frame and record its intensity.
    pub fn step(&mut self) -> Result<FrameSnapshot, SimulationError> {
        self.system.step_all(self.dt);

        let transiting = self.system.collect_transiting(&self.projector.sightline());
        let intensity = self.projector.compute_intensity(&self.star, &transiting);
        self.recorder.record(intensity)?;

        let snapshot = FrameSnapshot {
            index: self.frame_index,
            positions: self.system.positions(self.projector.canvas().center()),
            transiting,
            intensity,
        };
        debug!(
            "Frame {}: {} transiting, intensity {:.4}",
            snapshot.index,
            snapshot.transiting.len(),
            snapshot.intensity
        );
        self.frame_index += 1;
        Ok(snapshot)
    }

    /// Run the remaining frames and return the normalised light curve.
    pub fn run(&mut self) -> Result<Vec<f64>, SimulationError> {
        while !self.is_finished() {
            self.step()?;
        }
        let relative = self.recorder.relative_brightness()?;
        info!(
            "Simulated {} frames, transit depth {:.4}",
            relative.len(),
            self.recorder.transit_depth()?
        );
        Ok(relative)
    }

    pub fn is_finished(&self) -> bool {
        self.frame_index >= self.frames
    }

    /// Number of frames already simulated.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn system(&self) -> &OrbitalSystem {
        &self.system
    }

    pub fn projector(&self) -> &TransitProjector {
        &self.projector
    }

    pub fn star(&self) -> &Star {
        &self.star
    }

    pub fn recorder(&self) -> &LightCurveRecorder {
        &self.recorder
    }

    /// Top-down view of a frame: bodies at their positions, star on top.
    pub fn render_orbits(&self, snapshot: &FrameSnapshot) -> Array2<u8> {
        render_orbit_view(
            self.projector.canvas(),
            self.star.radius,
            &snapshot.positions,
        )
    }

    /// Side view of a frame as seen along the sightline.
    pub fn render_transit(&self, snapshot: &FrameSnapshot) -> Array2<u8> {
        self.projector.render(&self.star, &snapshot.transiting)
    }
}
