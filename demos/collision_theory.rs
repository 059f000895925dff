//! # Collision Theory
//!
//! Two reactant species in a box. A-B contacts faster than the activation
//! threshold produce a product. Hotter mixtures react faster; a higher
//! threshold slows the reaction down.
//!
//! Prints the reaction progress for a few temperature and threshold
//! combinations.
//!
//! Run with: `cargo run --example collision_theory`

use kinetics::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME: f32 = 1.0 / 60.0;
const SECONDS: usize = 10;

fn main() -> kinetics::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut sim = Simulation::new()
        .with_mode(Mode::Reactive)
        .with_particle_count(200)
        .with_seed(2024)
        .build()?;

    for (temperature, activation_energy) in [(150.0, 0.05), (600.0, 0.05), (600.0, 40.0), (1000.0, 40.0)] {
        sim.configure(
            Options::new()
                .temperature(temperature)
                .activation_energy(activation_energy),
        )?;
        sim.reset();

        info!(temperature, activation_energy, "mixing reactants");
        let mut timeline = Vec::with_capacity(SECONDS);
        for _ in 0..SECONDS {
            for _ in 0..60 {
                sim.step(FRAME);
            }
            timeline.push(sim.stats().products);
        }

        let stats = sim.stats();
        println!(
            "T = {:>6.0}  Ea = {:>5.2}  products after each second: {:?}  (A {}, B {}, reactions {})",
            temperature, activation_energy, timeline, stats.reactant_a, stats.reactant_b, stats.total_reactions
        );
    }

    Ok(())
}
