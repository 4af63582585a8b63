//! drape Scene Runner
//!
//! Loads a cloth scene from JSON, steps it headless and optionally writes
//! the final surface out for a renderer.
//!
//! # Usage
//!
//! ```bash
//! drape-runner scenes/flag.json
//! drape-runner scenes/curtain.json --steps 1200 --output curtain.json
//! drape-runner --log-level debug
//! ```

use anyhow::Context;
use clap::Parser;
use drape::{ClothGrid, SimClock};
use drape_runner::SceneConfig;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Headless cloth scene runner
#[derive(Parser, Debug)]
#[command(name = "drape-runner")]
#[command(version, about = "Run a drape cloth scene headless", long_about = None)]
struct Cli {
    /// Scene file; defaults are used when missing or unreadable
    scene: Option<PathBuf>,

    /// Override the number of steps
    #[arg(short, long)]
    steps: Option<u32>,

    /// Write the final geometry as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut scene = match &cli.scene {
        Some(path) => SceneConfig::load(path).unwrap_or_else(|e| {
            warn!("Failed to load scene from {:?}: {}", path, e);
            warn!("Using default scene.");
            SceneConfig::default()
        }),
        None => {
            info!("No scene file specified, using defaults.");
            SceneConfig::default()
        }
    };
    if let Some(steps) = cli.steps {
        scene.steps = steps;
    }

    let mut cloth = scene.build_cloth().context("building cloth")?;
    info!(
        size = scene.size,
        springs = cloth.springs().len(),
        triangles = cloth.triangles().len(),
        fixed = cloth.fixed_count(),
        "cloth ready"
    );

    scene.drive(&mut cloth, report)?;

    if let Some(path) = &cli.output {
        let json = serde_json::to_string(&cloth.export_geometry())?;
        fs::write(path, json).with_context(|| format!("writing {:?}", path))?;
        info!("Wrote geometry to {:?}", path);
    }

    Ok(())
}

fn report(cloth: &ClothGrid, clock: &SimClock) {
    let step = clock.steps();
    let (lo, hi) = cloth.bounding_box();
    let energy = cloth.total_energy();
    if !energy.is_finite() {
        warn!(step, "cloth energy is no longer finite; timestep may be too large");
    }
    info!(
        step,
        seconds = clock.elapsed(),
        kinetic = cloth.kinetic_energy(),
        total = energy,
        min = ?lo,
        max = ?hi,
        "progress"
    );
}
