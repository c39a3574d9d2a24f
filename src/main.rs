//! Headless driver.
//!
//! ```text
//! leipnik [config.json|-] [frames] [vertices.bin]
//! ```
//!
//! Runs the simulation for `frames` frames (default 600) on a fixed 60 Hz
//! clock, logging per-second stats. When a third argument is given, the
//! final frame's trail vertices are written there as raw `TrailVertex`
//! bytes. Set `RUST_LOG=debug` to see spawns, resets and evictions.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use leipnik::prelude::*;
use log::{error, info, warn};

const DEFAULT_FRAMES: u64 = 600;
const FRAME_RATE: u64 = 60;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let config = match args.get(1).map(String::as_str) {
        None | Some("-") => SimConfig::default(),
        Some(path) => match SimConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to load config from {}: {}", path, e);
                warn!("Using default configuration.");
                SimConfig::default()
            }
        },
    };
    let frames = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let export = args.get(3).map(PathBuf::from);

    let mut sim = match Simulation::new().with_config(config).build() {
        Ok(sim) => sim,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let mut time = Time::fixed(Duration::from_micros(1_000_000 / FRAME_RATE));
    let mut peak_saturated = 0;
    let mut stats = |frame: &Frame<'_>| {
        peak_saturated = peak_saturated.max(frame.saturated);
        if frame.index % FRAME_RATE == 0 {
            let extent = frame
                .trails()
                .map(|t| t.points[0].length())
                .fold(0.0_f64, f64::max);
            info!(
                "frame {:>5}: {:>3} trails, {:>3} saturated, max |head| {:.2}, rotation {:.2}",
                frame.index,
                frame.len(),
                frame.saturated,
                extent,
                frame.rotation_y
            );
        }
    };

    sim.start(time.elapsed());
    for _ in 0..frames {
        let now = time.update();
        sim.run_frame(now, &mut stats);
    }
    sim.stop();

    info!(
        "ran {} frames ({:.1} s simulated clock), {} particles, peak saturated {}",
        time.frame(),
        time.elapsed().as_secs_f64(),
        sim.population().len(),
        peak_saturated
    );

    if let Some(path) = export {
        let batch = match sim.current_frame() {
            Some(frame) => frame.line_batch(),
            None => LineBatch::default(),
        };
        match fs::write(&path, leipnik::bytemuck::cast_slice::<TrailVertex, u8>(&batch.vertices)) {
            Ok(()) => info!(
                "wrote {} vertices in {} lines to {}",
                batch.vertices.len(),
                batch.lines.len(),
                path.display()
            ),
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    sim.teardown();
}
