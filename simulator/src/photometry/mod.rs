//! Transit photometry: frame intensities and the light curve they form

pub mod light_curve;
pub mod transit;

pub use light_curve::{LightCurveError, LightCurveRecorder};
pub use transit::{ProjectionMethod, Star, TransitProjector};
