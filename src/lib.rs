//! # kinetics - particle kinetics core
//!
//! A bounded, real-time N-body core for educational states-of-matter and
//! collision-theory visualizations. The crate simulates; the host renders.
//!
//! kinetics owns the particle buffers, the spatial grid and the random
//! generator. The host calls [`Simulation::step`] once per displayed frame,
//! draws what it gets back and feeds slider changes through
//! [`Simulation::configure`] between frames.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kinetics::prelude::*;
//!
//! fn main() -> kinetics::Result<()> {
//!     let mut sim = Simulation::new()
//!         .with_particle_count(300)
//!         .with_temperature(250.0)
//!         .build()?;
//!
//!     for _ in 0..600 {
//!         let frame = sim.step(1.0 / 60.0);
//!         println!("{} at T_kin = {:.0}", frame.phase.label(), frame.stats.kinetic_temperature);
//!     }
//!
//!     sim.configure(Options::new().temperature(900.0))?;
//!     assert_eq!(sim.classify_phase(), Phase::Plasma);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Modes
//!
//! - [`Mode::Ensemble`]: one neutral species held together by a short-range
//!   pairwise force and pulled down by gravity while cold. Heating it melts
//!   and boils the lattice; above 800 the forces switch off (plasma).
//! - [`Mode::Reactive`]: `ReactantA` and `ReactantB` particles fly
//!   ballistically. An A-B contact faster than the activation threshold
//!   turns both into `Product`.
//!
//! ### Each step
//!
//! 1. Rebuild the [`SpatialGrid`] and accumulate pairwise forces (ensemble).
//! 2. Integrate with semi-implicit Euler, `dt` capped at 1/30 s.
//! 3. Thermostat toward the temperature input, then clamp speed and
//!    repair non-finite state.
//! 4. Reflect off the [`Container`] walls and piston.
//! 5. Resolve collisions and reactions (reactive).
//!
//! ### Phase
//!
//! [`classify_phase`] maps `(temperature, pressure)` to a [`Phase`]. It is a
//! pure label for coloring and never feeds back into the dynamics.
//!
//! ## Rendering
//!
//! [`StepResult`] borrows the particle slice directly. Hosts that upload
//! instance buffers use [`Simulation::instances`], whose records are
//! `bytemuck::Pod`.

pub mod boundary;
pub mod collision;
pub mod config;
pub mod error;
pub mod forces;
pub mod instance;
pub mod integrator;
pub mod particle;
pub mod phase;
mod simulation;
pub mod spatial;
mod spawn;
pub mod species;
pub mod thermostat;
pub mod time;

pub use bytemuck;
pub use boundary::Container;
pub use collision::{CollisionCounts, CollisionResolver, ReactedPair};
pub use config::{Mode, Options, SimConfig, MAX_HALF_EXTENT, MAX_PARTICLES};
pub use error::{ConfigError, ErrorKind, Result};
pub use forces::ForceModel;
pub use glam::{IVec3, Vec3};
pub use instance::ParticleInstance;
pub use integrator::Integrator;
pub use kinetics_derive::StateTag;
pub use particle::Particle;
pub use phase::{classify_phase, Phase};
pub use simulation::{Simulation, StepResult, StepStats};
pub use spatial::SpatialGrid;
pub use spawn::{lattice_positions, random_unit_vector, SpawnContext};
pub use species::Species;
pub use thermostat::Thermostat;
pub use time::SimClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use kinetics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::boundary::Container;
    pub use crate::collision::{CollisionResolver, ReactedPair};
    pub use crate::config::{Mode, Options, SimConfig};
    pub use crate::forces::ForceModel;
    pub use crate::integrator::Integrator;
    pub use crate::particle::Particle;
    pub use crate::phase::{classify_phase, Phase};
    pub use crate::simulation::{Simulation, StepResult, StepStats};
    pub use crate::spawn::SpawnContext;
    pub use crate::species::Species;
    pub use crate::thermostat::Thermostat;
    pub use crate::time::SimClock;
    pub use crate::Vec3;
    pub use kinetics_derive::StateTag;
}
