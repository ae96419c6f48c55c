//! Closed-form orbital propagation for planets and moons

pub mod body;
pub mod system;

pub use body::{BodyId, OrbitError, OrbitalBody, OrbitalElements, DEFAULT_ARGUMENT};
pub use system::{BodyPosition, OrbitalSystem, Sightline, TransitingBody};
