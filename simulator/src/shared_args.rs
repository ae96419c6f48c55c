use crate::config::{ConfigError, SimulationConfig};
use crate::photometry::ProjectionMethod;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Intensity computation selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Rasterise the side view and average its pixels
    Raster,
    /// Exact lens-area formula
    Analytic,
}

impl std::fmt::Display for MethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodArg::Raster => write!(f, "raster"),
            MethodArg::Analytic => write!(f, "analytic"),
        }
    }
}

impl MethodArg {
    pub fn to_method(self) -> ProjectionMethod {
        match self {
            MethodArg::Raster => ProjectionMethod::Raster,
            MethodArg::Analytic => ProjectionMethod::Analytic,
        }
    }
}

/// Common arguments shared across simulation binaries
#[derive(Parser, Debug, Clone)]
pub struct SharedSimulationArgs {
    /// JSON system configuration; the built-in demonstration system if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames, overriding the configuration
    #[arg(long)]
    pub frames: Option<usize>,

    /// Time step per frame, overriding the configuration
    #[arg(long)]
    pub dt: Option<f64>,

    /// Intensity computation, overriding the configuration
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Enable debug output
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// Resolve the run configuration from a file (or defaults) plus overrides
///
/// # Example
/// ```no_run
/// use clap::Parser;
/// use transit_simulator::shared_args::{load_config, SharedSimulationArgs};
///
/// let args = SharedSimulationArgs::parse_from(["sim", "--frames", "100"]);
/// let config = load_config(&args)?;
/// assert_eq!(config.frames, 100);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_config(args: &SharedSimulationArgs) -> Result<SimulationConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(method) = args.method {
        config.method = method.to_method();
    }

    if args.debug {
        println!(
            "Config: {} frames, dt={}, star radius {}, scale {}, {} bodies, {:?}",
            config.frames,
            config.dt,
            config.star_radius,
            config.scale,
            config.bodies.len(),
            config.method
        );
    }

    config.validate()?;
    Ok(config)
}
