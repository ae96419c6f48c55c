//! Synthetic transit light curves for a star with planets and moons.
//!
//! Bodies follow closed-form Keplerian orbits ([`orbit`]). Every frame the
//! bodies on the observer's side of their primary are projected onto the
//! sightline and their shadows cut out of the star's disk ([`photometry`]);
//! the mean brightness of that view is one light curve sample. A [`Scene`]
//! drives the frame loop from a [`SimulationConfig`].
//!
//! Rendering and plotting are consumers of per-frame [`FrameSnapshot`]s and
//! the final curve, and live in [`image_proc`] and [`report`].

pub mod algo;
pub mod config;
pub mod image_proc;
pub mod orbit;
pub mod photometry;
pub mod report;
pub mod scene;
pub mod shared_args;

pub use config::{BodyConfig, ConfigError, SimulationConfig};
pub use orbit::{BodyId, OrbitError, OrbitalBody, OrbitalElements, OrbitalSystem};
pub use photometry::{
    LightCurveError, LightCurveRecorder, ProjectionMethod, Star, TransitProjector,
};
pub use scene::{FrameSnapshot, Scene, SimulationError};
