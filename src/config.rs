//! Simulation configuration.
//!
//! [`SimConfig`] is the full parameter set a [`Simulation`](crate::Simulation)
//! runs with. [`Options`] is the partial update a host sends between frames
//! through [`Simulation::configure`](crate::Simulation::configure): every
//! field is optional and only the fields that are `Some` change.
//!
//! The tuning defaults are empirical visual constants. They keep a few
//! hundred particles stable at interactive frame rates; none of them is
//! derived from a real material.

use crate::boundary::Container;
use crate::collision::CollisionResolver;
use crate::error::{ConfigError, Result};
use crate::forces::ForceModel;
use crate::integrator::Integrator;
use crate::thermostat::Thermostat;

/// Largest particle count the real-time core accepts.
pub const MAX_PARTICLES: usize = 4096;

/// Largest accepted container half extent on any axis.
pub const MAX_HALF_EXTENT: f32 = 1.0e4;

/// Which regime the simulation runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// A single neutral species under pairwise forces and gravity, shown as
    /// a solid, liquid, gas or plasma.
    #[default]
    Ensemble,
    /// Two reactant species bouncing ballistically, reacting on energetic
    /// contact.
    Reactive,
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of particles, between 1 and [`MAX_PARTICLES`].
    pub particle_count: usize,
    /// Temperature input (slider units, not kelvin).
    pub temperature: f32,
    /// Pressure input. Drives the piston and the phase thresholds.
    pub pressure: f32,
    /// Ensemble or reactive regime.
    pub mode: Mode,
    /// Seed for every random draw the simulation makes.
    pub seed: u64,
    /// Fraction of reactive-mode particles seeded as `ReactantA`.
    pub reactant_ratio: f32,
    /// Container walls and piston.
    pub container: Container,
    /// Pairwise force law.
    pub forces: ForceModel,
    /// Time integration and stability limits.
    pub integrator: Integrator,
    /// Velocity thermostat.
    pub thermostat: Thermostat,
    /// Collision and reaction parameters.
    pub collisions: CollisionResolver,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            temperature: 300.0,
            pressure: 0.0,
            mode: Mode::Ensemble,
            seed: 0x6b69_6e65,
            reactant_ratio: 0.5,
            container: Container::default(),
            forces: ForceModel::default(),
            integrator: Integrator::default(),
            thermostat: Thermostat::default(),
            collisions: CollisionResolver::default(),
        }
    }
}

impl SimConfig {
    /// Check every host-facing value.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(ConfigError::InvalidParticleCount(self.particle_count));
        }
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::TooManyParticles {
                requested: self.particle_count,
                max: MAX_PARTICLES,
            });
        }
        if !is_non_negative(self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if !is_non_negative(self.pressure) {
            return Err(ConfigError::InvalidPressure(self.pressure));
        }
        let restitution = self.container.restitution;
        if !(restitution > 0.0 && restitution < 1.0) {
            return Err(ConfigError::InvalidRestitution(restitution));
        }
        if !(0.0..=1.0).contains(&self.reactant_ratio) {
            return Err(ConfigError::InvalidRatio(self.reactant_ratio));
        }
        if !is_non_negative(self.collisions.activation_energy) {
            return Err(ConfigError::InvalidActivationEnergy(self.collisions.activation_energy));
        }
        let extents = self.container.base_half_extents;
        // Past this the grid's cell keys saturate the i32 range
        let in_range = extents.cmpgt(crate::Vec3::ZERO).all()
            && extents.cmple(crate::Vec3::splat(MAX_HALF_EXTENT)).all();
        if !in_range {
            return Err(ConfigError::InvalidBounds(extents.to_array()));
        }
        Ok(())
    }

    /// Apply `options` on top of this configuration.
    ///
    /// Returns the merged configuration without touching `self`; the caller
    /// validates it and swaps it in.
    pub fn merged(&self, options: &Options) -> SimConfig {
        let mut next = self.clone();
        if let Some(count) = options.particle_count {
            next.particle_count = count;
        }
        if let Some(temperature) = options.temperature {
            next.temperature = temperature;
        }
        if let Some(pressure) = options.pressure {
            next.pressure = pressure;
        }
        if let Some(mode) = options.mode {
            next.mode = mode;
        }
        if let Some(restitution) = options.restitution {
            next.container.restitution = restitution;
        }
        if let Some(seed) = options.seed {
            next.seed = seed;
        }
        if let Some(ratio) = options.reactant_ratio {
            next.reactant_ratio = ratio;
        }
        if let Some(energy) = options.activation_energy {
            next.collisions.activation_energy = energy;
        }
        next
    }

    /// Whether switching from `self` to `next` requires fresh particle buffers.
    pub fn needs_reinit(&self, next: &SimConfig) -> bool {
        self.particle_count != next.particle_count
            || self.mode != next.mode
            || self.seed != next.seed
            || self.reactant_ratio != next.reactant_ratio
            || self.container.base_half_extents != next.container.base_half_extents
    }
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// A partial configuration update.
///
/// ```ignore
/// sim.configure(Options::new().temperature(650.0).pressure(40.0))?;
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub particle_count: Option<usize>,
    pub temperature: Option<f32>,
    pub pressure: Option<f32>,
    pub mode: Option<Mode>,
    pub restitution: Option<f32>,
    pub seed: Option<u64>,
    pub reactant_ratio: Option<f32>,
    pub activation_energy: Option<f32>,
}

impl Options {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particle_count(mut self, count: usize) -> Self {
        self.particle_count = Some(count);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn reactant_ratio(mut self, ratio: f32) -> Self {
        self.reactant_ratio = Some(ratio);
        self
    }

    pub fn activation_energy(mut self, energy: f32) -> Self {
        self.activation_energy = Some(energy);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
