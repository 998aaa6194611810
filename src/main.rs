use std::time::{Duration, Instant};

use clap::Parser;
use intersection_sim::{SimConfig, Simulation};
use log::info;

#[derive(Parser)]
#[command(name = "intersection-sim")]
#[command(about = "Runs the intersection simulation headless and reports throughput")]
struct Cli {
    /// Number of vehicles (defaults to the configured population)
    #[arg(long)]
    vehicles: Option<usize>,

    /// Number of frames to simulate
    #[arg(long, default_value = "600")]
    frames: usize,

    /// Frames per wall-clock second to pace at, 0 to run flat out
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Seed for reproducible spawning
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of the arena
    #[arg(long)]
    arena_size: Option<f64>,

    /// JSON file to load the configuration from
    #[cfg(feature = "serde")]
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    #[cfg(feature = "serde")]
    let mut config: SimConfig = match &cli.config {
        Some(path) => serde_json::from_slice(&std::fs::read(path)?)?,
        None => SimConfig::default(),
    };
    #[cfg(not(feature = "serde"))]
    let mut config = SimConfig::default();

    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(size) = cli.arena_size {
        config.arena_size = size;
    }
    let vehicles = cli.vehicles.unwrap_or(config.population);

    let mut sim = Simulation::new(config);
    sim.initialize(vehicles)?;
    info!(
        "Simulating {} vehicles for {} frames...",
        sim.population(),
        cli.frames
    );

    let frame_time = match cli.fps {
        0 => Duration::ZERO,
        fps => Duration::from_secs(1) / fps,
    };
    let start = Instant::now();
    let mut busy = Duration::ZERO;
    for _ in 0..cli.frames {
        let frame_start = Instant::now();
        sim.tick();
        if let Some(snapshot) = sim.maybe_flush(Instant::now()) {
            info!(
                "frame {}: throughput {}/s, waiting {}",
                sim.frame(),
                snapshot.throughput,
                snapshot.waiting_count
            );
        }
        let elapsed = frame_start.elapsed();
        busy += elapsed;
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    println!(
        "Avg. frame: {:?} over {:?} wall time, {} vehicles retired",
        average_frame(busy, cli.frames),
        start.elapsed(),
        sim.stats().total_retired()
    );
    Ok(())
}

/// The mean time spent per frame, saturating the frame count at `u32::MAX`.
fn average_frame(busy: Duration, frames: usize) -> Duration {
    busy / u32::try_from(frames.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod test {
    use super::average_frame;
    use std::time::Duration;

    #[test]
    fn average_frame_time() {
        assert_eq!(average_frame(Duration::from_secs(2), 4), Duration::from_millis(500));
        assert_eq!(average_frame(Duration::from_secs(2), 0), Duration::from_secs(2));
    }

    #[test]
    fn average_frame_saturates_frame_count() {
        let busy = Duration::from_secs(u32::MAX as u64);
        assert_eq!(average_frame(busy, usize::MAX), Duration::from_secs(1));
    }
}
