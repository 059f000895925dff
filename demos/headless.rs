//! # Headless Heating Sweep
//!
//! Runs an ensemble without a window and ramps the temperature from a cold
//! lattice up to plasma, printing the phase label and readouts once a second
//! of simulated time.
//!
//! Set `RUST_LOG=kinetics=debug` to see configuration and reset events.
//!
//! Run with: `cargo run --example headless [particle_count]`

use kinetics::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME: f32 = 1.0 / 60.0;

fn main() -> kinetics::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(300);

    let mut sim = Simulation::new()
        .with_particle_count(count)
        .with_temperature(50.0)
        .build()?;

    info!(count, "starting heating sweep");
    println!("{:>8} {:>8} {:>8} {:>10} {:>10} {:>8}", "T", "p", "phase", "T_kin", "mean v.y", "ceiling");

    for (temperature, pressure) in [(50.0, 0.0), (250.0, 0.0), (500.0, 0.0), (500.0, 80.0), (950.0, 0.0)] {
        sim.configure(Options::new().temperature(temperature).pressure(pressure))?;

        // Give the thermostat a few seconds to catch up
        for _ in 0..180 {
            sim.step(FRAME);
        }

        let result = sim.step(FRAME);
        println!(
            "{:>8.0} {:>8.0} {:>8} {:>10.1} {:>10.3} {:>8.2}",
            temperature,
            pressure,
            result.phase.label(),
            result.stats.kinetic_temperature,
            result.stats.mean_velocity.y,
            result.stats.ceiling,
        );
    }

    info!(frames = sim.clock().frame(), elapsed = sim.clock().elapsed(), "sweep finished");
    Ok(())
}
