//! Transit light curve simulator
//!
//! Propagates a star system frame by frame, measures how much of the star
//! the near-side bodies hide, and writes the resulting light curve.
//!
//! # Usage
//!
//! ```bash
//! # Demonstration system, 450 frames, CSV and plot in ./transit_output
//! cargo run --release --bin transit_sim
//!
//! # Custom system with per-frame PNG snapshots of both views
//! cargo run --release --bin transit_sim -- --config system.json --save-frames
//!
//! # Closed-form intensities instead of rasterisation
//! cargo run --release --bin transit_sim -- --method analytic --frames 1000
//! ```
//!
//! # Outputs
//!
//! - `light_curve.csv`: frame, raw intensity, relative brightness
//! - `light_curve.png`: relative brightness against frame number
//! - `frames/orbits_NNNN.png`, `frames/transit_NNNN.png` with `--save-frames`

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use transit_simulator::image_proc::save_canvas;
use transit_simulator::report::{plot_light_curve, write_light_curve_csv};
use transit_simulator::shared_args::{load_config, SharedSimulationArgs};
use transit_simulator::Scene;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Directory for the light curve and frame snapshots
    #[arg(long, default_value = "transit_output")]
    output_dir: PathBuf,

    /// Save the orbit and transit views of every frame as PNG
    #[arg(long, default_value_t = false)]
    save_frames: bool,

    /// Skip the light curve plot
    #[arg(long, default_value_t = false)]
    no_plot: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args.shared)?;
    let mut scene = Scene::from_config(&config)?;

    std::fs::create_dir_all(&args.output_dir)?;
    let frames_dir = args.output_dir.join("frames");
    if args.save_frames {
        std::fs::create_dir_all(&frames_dir)?;
    }

    println!(
        "Simulating {} frames of {} bodies ({:?} projection on {})",
        config.frames,
        scene.system().len(),
        config.method,
        config.canvas
    );

    let progress = ProgressBar::new(config.frames as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("#>-"),
    );

    while !scene.is_finished() {
        let snapshot = scene.step()?;
        if args.save_frames {
            save_canvas(
                &scene.render_orbits(&snapshot),
                frames_dir.join(format!("orbits_{:04}.png", snapshot.index)),
            )?;
            save_canvas(
                &scene.render_transit(&snapshot),
                frames_dir.join(format!("transit_{:04}.png", snapshot.index)),
            )?;
        }
        progress.inc(1);
    }
    progress.finish_with_message("done");

    let recorder = scene.recorder();
    let relative = recorder.relative_brightness()?;

    let csv_path = args.output_dir.join("light_curve.csv");
    write_light_curve_csv(
        BufWriter::new(File::create(&csv_path)?),
        recorder.samples(),
        &relative,
    )?;
    println!("Light curve written to: {}", csv_path.display());

    if !args.no_plot {
        let plot_path = args.output_dir.join("light_curve.png");
        plot_light_curve(&relative, &plot_path)?;
        println!("Plot saved to: {}", plot_path.display());
    }

    println!("Summary:");
    println!("  Frames: {}", relative.len());
    println!("  Peak intensity: {:.4}", recorder.peak()?);
    println!("  Transit depth: {:.4}", recorder.transit_depth()?);

    Ok(())
}
