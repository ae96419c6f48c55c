//! Light curve accumulation and normalisation

use thiserror::Error;

/// Errors raised when recording or normalising a light curve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightCurveError {
    #[error("Light curve has no recorded samples")]
    EmptyLightCurve,
    #[error("All {0} recorded samples are zero; relative brightness is undefined")]
    DegenerateBrightness(usize),
    #[error("Intensity samples must be finite and non-negative, got {0}")]
    InvalidSample(f64),
}

/// Accumulates one raw intensity sample per frame.
///
/// Normalisation is a pure function of the recorded samples: calling
/// [`relative_brightness`](Self::relative_brightness) repeatedly yields the
/// same sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCurveRecorder {
    samples: Vec<f64>,
}

impl LightCurveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(frames: usize) -> Self {
        Self {
            samples: Vec::with_capacity(frames),
        }
    }

    /// Append a frame's intensity.
    ///
    /// # Errors
    /// [`LightCurveError::InvalidSample`] for negative or non-finite
    /// intensities, which are not stored.
    pub fn record(&mut self, intensity: f64) -> Result<(), LightCurveError> {
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(LightCurveError::InvalidSample(intensity));
        }
        self.samples.push(intensity);
        Ok(())
    }

    /// Raw samples in frame order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Brightest recorded sample.
    pub fn peak(&self) -> Result<f64, LightCurveError> {
        self.samples
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or(LightCurveError::EmptyLightCurve)
    }

    /// Every sample divided by the brightest one.
    ///
    /// Values lie in `[0, 1]` with the brightest frame at exactly 1.0; a
    /// frame whose star is completely hidden maps to 0.
    ///
    /// # Errors
    /// [`LightCurveError::EmptyLightCurve`] before any sample is recorded and
    /// [`LightCurveError::DegenerateBrightness`] if every sample is zero.
    pub fn relative_brightness(&self) -> Result<Vec<f64>, LightCurveError> {
        let peak = self.peak()?;
        if peak <= 0.0 {
            return Err(LightCurveError::DegenerateBrightness(self.samples.len()));
        }
        Ok(self.samples.iter().map(|sample| sample / peak).collect())
    }

    /// Deepest fractional dimming over the run, `1 - min(relative brightness)`.
    pub fn transit_depth(&self) -> Result<f64, LightCurveError> {
        let relative = self.relative_brightness()?;
        let dimmest = relative.iter().copied().fold(1.0, f64::min);
        Ok(1.0 - dimmest)
    }
}
