//! Simulation builder and stepper

use crate::boundary::Container;
use crate::collision::{CollisionResolver, ReactedPair};
use crate::config::{Mode, Options, SimConfig};
use crate::error::Result;
use crate::forces::ForceModel;
use crate::instance::{color_hint, ParticleInstance};
use crate::integrator::Integrator;
use crate::particle::Particle;
use crate::phase::Phase;
use crate::spatial::SpatialGrid;
use crate::spawn::{lattice_positions, scattered_positions, thermal_velocity, SpawnContext};
use crate::species::Species;
use crate::thermostat::Thermostat;
use crate::time::SimClock;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

type Spawner = Box<dyn Fn(&mut SpawnContext) -> Particle + Send + Sync>;

/// Aggregate readouts refreshed after every step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepStats {
    /// Mean particle speed.
    pub mean_speed: f32,
    /// Mean velocity vector. Its `y` component shows gravity-induced drift.
    pub mean_velocity: Vec3,
    /// Temperature whose thermostat target equals `mean_speed`.
    pub kinetic_temperature: f32,
    /// Current piston height.
    pub ceiling: f32,
    /// Particles that touched a wall this step.
    pub wall_hits: usize,
    /// Particles whose non-finite state was repaired this step.
    pub corrected: usize,
    /// Reactions since the last reset.
    pub total_reactions: usize,
    /// Particles currently `ReactantA`.
    pub reactant_a: usize,
    /// Particles currently `ReactantB`.
    pub reactant_b: usize,
    /// Particles currently `Product`.
    pub products: usize,
}

/// Read-only view of the simulation after a step.
///
/// Borrows the simulation's buffers; drop it before calling
/// [`Simulation::configure`] or stepping again.
#[derive(Clone, Copy, Debug)]
pub struct StepResult<'a> {
    pub particles: &'a [Particle],
    pub phase: Phase,
    /// Pairs that reacted during this step.
    pub reactions: &'a [ReactedPair],
    pub stats: StepStats,
    /// Accepted frames since the last reset.
    pub frame: u64,
}

impl StepResult<'_> {
    /// RGB color hint for particle `index`.
    pub fn color_hint(&self, index: usize) -> Option<Vec3> {
        self.particles.get(index).map(|p| color_hint(p, self.phase))
    }
}

/// A particle-kinetics simulation.
///
/// Use method chaining to configure, then call `.build()` to seed the
/// particle buffers:
///
/// ```ignore
/// let mut sim = Simulation::new()
///     .with_particle_count(300)
///     .with_temperature(250.0)
///     .with_seed(7)
///     .build()?;
///
/// loop {
///     let frame = sim.step(1.0 / 60.0);
///     draw(frame.particles, frame.phase);
/// }
/// ```
pub struct Simulation {
    config: SimConfig,
    spawner: Option<Spawner>,
    particles: Vec<Particle>,
    positions: Vec<Vec3>,
    forces: Vec<Vec3>,
    reactions: Vec<ReactedPair>,
    instances: Vec<ParticleInstance>,
    grid: SpatialGrid,
    rng: SmallRng,
    clock: SimClock,
    phase: Phase,
    stats: StepStats,
    total_reactions: usize,
    initialized: bool,
}

impl Simulation {
    /// Create a new simulation with default settings.
    pub fn new() -> Self {
        Self::from_config(SimConfig::default())
    }

    /// Create a simulation from a complete configuration.
    pub fn from_config(config: SimConfig) -> Self {
        Self {
            grid: SpatialGrid::new(config.forces.cutoff),
            rng: SmallRng::seed_from_u64(config.seed),
            clock: SimClock::new(),
            phase: Phase::classify(config.temperature, config.pressure),
            config,
            spawner: None,
            particles: Vec::new(),
            positions: Vec::new(),
            forces: Vec::new(),
            reactions: Vec::new(),
            instances: Vec::new(),
            stats: StepStats::default(),
            total_reactions: 0,
            initialized: false,
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the temperature input.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the pressure input.
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.config.pressure = pressure;
        self
    }

    /// Choose the ensemble or reactive regime.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the wall restitution.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.config.container.restitution = restitution;
        self
    }

    /// Set the seed every random draw derives from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the fraction of reactive particles seeded as `ReactantA`.
    pub fn with_reactant_ratio(mut self, ratio: f32) -> Self {
        self.config.reactant_ratio = ratio;
        self
    }

    /// Replace the default initial layout.
    ///
    /// Called once per particle on every (re)initialization. Positions
    /// outside the container are clamped onto its walls.
    pub fn with_spawner<F>(mut self, spawner: F) -> Self
    where
        F: Fn(&mut SpawnContext) -> Particle + Send + Sync + 'static,
    {
        self.spawner = Some(Box::new(spawner));
        self
    }

    /// Set the pairwise force law.
    pub fn with_force_model(mut self, forces: ForceModel) -> Self {
        self.config.forces = forces;
        self
    }

    /// Set the thermostat.
    pub fn with_thermostat(mut self, thermostat: Thermostat) -> Self {
        self.config.thermostat = thermostat;
        self
    }

    /// Set the integrator.
    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.config.integrator = integrator;
        self
    }

    /// Set the collision and reaction parameters.
    pub fn with_collisions(mut self, collisions: CollisionResolver) -> Self {
        self.config.collisions = collisions;
        self
    }

    /// Set the uncompressed container half extents.
    pub fn with_bounds(mut self, half_extents: Vec3) -> Self {
        self.config.container.base_half_extents = half_extents;
        self
    }

    /// Validate the configuration and seed the particle buffers.
    pub fn build(mut self) -> Result<Self> {
        if let Err(err) = self.config.validate() {
            warn!(%err, "rejected simulation configuration");
            return Err(err);
        }
        self.reset();
        Ok(self)
    }

    /// Apply a partial configuration update between steps.
    ///
    /// All-or-nothing: if any field is out of range the previous
    /// configuration stays in effect and the error is returned. A changed
    /// particle count, mode, seed or reactant ratio reinitializes the
    /// particles; other changes apply from the next step.
    pub fn configure(&mut self, options: Options) -> Result<()> {
        let next = self.config.merged(&options);
        if let Err(err) = next.validate() {
            warn!(%err, ?options, "rejected configuration update");
            return Err(err);
        }

        let reinit = !self.initialized || self.config.needs_reinit(&next);
        self.config = next;
        debug!(?options, reinit, "configuration updated");

        if reinit {
            self.reset();
        } else {
            self.apply_environment();
            // The piston may have moved below some particles
            for particle in &mut self.particles {
                self.config.container.reflect(particle);
            }
            self.refresh_stats(0, 0);
        }
        Ok(())
    }

    /// Reseed and reinitialize every particle.
    ///
    /// Reacted species, counters and the clock are discarded. The same
    /// configuration always produces the same initial state.
    pub fn reset(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.apply_environment();
        self.clock.reset();

        self.particles = self.spawn_particles();
        self.forces.clear();
        self.reactions.clear();
        self.total_reactions = 0;
        self.initialized = true;
        self.refresh_stats(0, 0);

        debug!(
            count = self.particles.len(),
            mode = ?self.config.mode,
            seed = self.config.seed,
            phase = self.phase.label(),
            "simulation reset"
        );
    }

    /// Advance by a host frame time of `dt` seconds.
    ///
    /// A non-positive or non-finite `dt` is a no-op that returns the previous
    /// result unchanged. Larger steps are capped at the integrator's
    /// `max_dt`.
    pub fn step(&mut self, dt: f32) -> StepResult<'_> {
        if !self.initialized {
            self.reset();
        }
        let integrator = self.config.integrator;
        if let Some(dt) = self.clock.advance(dt, |dt| integrator.clamp_dt(dt)) {
            self.advance(dt);
        }
        self.result()
    }

    fn advance(&mut self, dt: f32) {
        let temperature = self.config.temperature;
        let reactive = self.config.mode == Mode::Reactive;
        let container = self.config.container;
        let thermostat = self.config.thermostat;
        let integrator = if reactive {
            self.config.integrator.with_gravity(0.0)
        } else {
            self.config.integrator
        };

        // Every force is accumulated before any particle moves
        if !reactive && self.config.forces.enabled_at(temperature) {
            self.refresh_grid(self.config.forces.cutoff);
            self.config.forces.accumulate(&self.positions, &self.grid, &mut self.forces);
        } else {
            self.forces.clear();
            self.forces.resize(self.particles.len(), Vec3::ZERO);
        }

        let fallback = container.center();
        let mut wall_hits = 0;
        let mut corrected = 0;
        for (particle, force) in self.particles.iter_mut().zip(&self.forces) {
            integrator.integrate(particle, *force, dt, temperature);
            thermostat.apply(particle, temperature, &mut self.rng);
            if integrator.stabilize(particle, fallback) {
                corrected += 1;
            }
            if container.reflect(particle) {
                wall_hits += 1;
            }
        }
        if corrected > 0 {
            warn!(corrected, frame = self.clock.frame(), "repaired non-finite particle state");
        }

        self.reactions.clear();
        if reactive {
            let cell_size = self.config.forces.cutoff.max(self.config.collisions.contact_distance());
            self.refresh_grid(cell_size);
            let counts = self
                .config
                .collisions
                .resolve_into(&mut self.particles, &self.grid, &mut self.reactions);
            // Separation can push a particle back through a wall
            for particle in &mut self.particles {
                container.reflect(particle);
            }
            self.total_reactions += counts.reactions;
        }

        self.refresh_stats(wall_hits, corrected);
    }

    fn refresh_grid(&mut self, cell_size: f32) {
        self.positions.clear();
        self.positions.extend(self.particles.iter().map(|p| p.position));
        self.grid.set_cell_size(cell_size);
        self.grid.rebuild(&self.positions);
    }

    /// Push the pressure and phase from the configuration into the derived
    /// state.
    fn apply_environment(&mut self) {
        self.config.container.set_pressure(self.config.pressure);
        self.phase = Phase::classify(self.config.temperature, self.config.pressure);
    }

    fn spawn_particles(&mut self) -> Vec<Particle> {
        let count = self.config.particle_count;
        let container = self.config.container;
        let thermal_speed = self.config.thermostat.target_speed(self.config.temperature);

        if let Some(spawner) = &self.spawner {
            let mut particles = Vec::with_capacity(count);
            for index in 0..count {
                let mut ctx = SpawnContext::new(index as u32, count as u32, &container, thermal_speed, &mut self.rng);
                let mut particle = spawner(&mut ctx);
                particle.position = container.clamp_position(particle.position);
                particles.push(particle);
            }
            return particles;
        }

        match self.config.mode {
            Mode::Ensemble => lattice_positions(count, &container, self.config.forces.equilibrium)
                .into_iter()
                .map(|position| Particle::new(position, thermal_velocity(thermal_speed, &mut self.rng)))
                .collect(),
            Mode::Reactive => {
                let separation = self.config.collisions.contact_distance();
                let positions = scattered_positions(count, &container, separation, &mut self.rng);
                let reactant_a = (count as f32 * self.config.reactant_ratio).round() as usize;
                positions
                    .into_iter()
                    .enumerate()
                    .map(|(i, position)| {
                        let species = if i < reactant_a { Species::ReactantA } else { Species::ReactantB };
                        Particle::with_species(position, thermal_velocity(thermal_speed, &mut self.rng), species)
                    })
                    .collect()
            }
        }
    }

    fn refresh_stats(&mut self, wall_hits: usize, corrected: usize) {
        let mut stats = StepStats {
            ceiling: self.config.container.ceiling(),
            wall_hits,
            corrected,
            total_reactions: self.total_reactions,
            ..Default::default()
        };

        let mut speed_sum = 0.0;
        let mut velocity_sum = Vec3::ZERO;
        for particle in &self.particles {
            speed_sum += particle.speed();
            velocity_sum += particle.velocity;
            match particle.species {
                Species::ReactantA => stats.reactant_a += 1,
                Species::ReactantB => stats.reactant_b += 1,
                Species::Product => stats.products += 1,
                Species::Neutral => {}
            }
        }

        if !self.particles.is_empty() {
            let n = self.particles.len() as f32;
            stats.mean_speed = speed_sum / n;
            stats.mean_velocity = velocity_sum / n;
            stats.kinetic_temperature = self.config.thermostat.temperature_for_speed(stats.mean_speed);
        }
        self.stats = stats;
    }

    fn result(&self) -> StepResult<'_> {
        StepResult {
            particles: &self.particles,
            phase: self.phase,
            reactions: &self.reactions,
            stats: self.stats,
            frame: self.clock.frame(),
        }
    }

    /// Phase of the current temperature and pressure inputs.
    pub fn classify_phase(&self) -> Phase {
        Phase::classify(self.config.temperature, self.config.pressure)
    }

    /// Renderer records for every particle, refreshed on each call.
    pub fn instances(&mut self) -> &[ParticleInstance] {
        let mut instances = std::mem::take(&mut self.instances);
        self.write_instances(&mut instances);
        self.instances = instances;
        &self.instances
    }

    /// Fill `out` with renderer records for every particle.
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(
            self.particles
                .iter()
                .map(|p| ParticleInstance::from_particle(p, self.phase)),
        );
    }

    /// Current configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current particle states.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pairs that reacted during the last accepted step.
    pub fn reactions(&self) -> &[ReactedPair] {
        &self.reactions
    }

    /// Current container, with the piston at the configured pressure.
    pub fn container(&self) -> &Container {
        &self.config.container
    }

    /// Phase label used for the last result.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Readouts from the last step.
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Frame clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Frame clock, for pausing or time scaling.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("particles", &self.particles.len())
            .field("phase", &self.phase)
            .field("frame", &self.clock.frame())
            .field("custom_spawner", &self.spawner.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn build(sim: Simulation) -> Simulation {
        sim.build().expect("valid configuration")
    }

    #[test]
    fn test_build_seeds_particles() {
        let sim = build(Simulation::new().with_particle_count(64));
        assert_eq!(sim.particles().len(), 64);
        assert!(sim.particles().iter().all(|p| p.species == Species::Neutral));
        assert!(sim.particles().iter().all(|p| sim.container().contains(p.position)));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let err = Simulation::new().with_particle_count(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidParticleCount(0));
    }

    #[test]
    fn test_reactive_split_follows_ratio() {
        let sim = build(
            Simulation::new()
                .with_mode(Mode::Reactive)
                .with_particle_count(40)
                .with_reactant_ratio(0.25),
        );
        let stats = sim.stats();
        assert_eq!(stats.reactant_a, 10);
        assert_eq!(stats.reactant_b, 30);
        assert_eq!(stats.products, 0);
    }

    #[test]
    fn test_non_positive_dt_is_a_noop() {
        let mut sim = build(Simulation::new().with_particle_count(20));
        sim.step(1.0 / 60.0);
        let before = sim.particles().to_vec();
        let frame = sim.clock().frame();

        for dt in [0.0, -1.0, f32::NAN] {
            let result = sim.step(dt);
            assert_eq!(result.frame, frame);
            assert_eq!(result.particles, &before[..]);
        }
    }

    #[test]
    fn test_step_caps_dt_at_integrator_max() {
        let mut sim = build(
            Simulation::new()
                .with_particle_count(8)
                .with_integrator(Integrator::default().with_max_dt(0.02)),
        );
        sim.step(0.5);
        assert_eq!(sim.clock().delta(), 0.02);
        assert_eq!(sim.clock().clamped_frames(), 1);

        sim.step(0.01);
        assert_eq!(sim.clock().delta(), 0.01);
        assert_eq!(sim.clock().clamped_frames(), 1);
    }

    #[test]
    fn test_spawner_positions_are_clamped() {
        let sim = build(
            Simulation::new()
                .with_particle_count(3)
                .with_spawner(|_| Particle::new(Vec3::splat(100.0), Vec3::ZERO)),
        );
        for p in sim.particles() {
            assert_eq!(p.position, sim.container().max_corner());
        }
    }

    #[test]
    fn test_pressure_update_keeps_particles() {
        let mut sim = build(Simulation::new().with_particle_count(50));
        let before = sim.particles().len();
        sim.configure(Options::new().pressure(400.0)).unwrap();
        assert_eq!(sim.particles().len(), before);
        assert!(sim.particles().iter().all(|p| sim.container().contains(p.position)));
        assert!(sim.stats().ceiling < 0.0);
    }

    #[test]
    fn test_instances_match_particles() {
        let mut sim = build(Simulation::new().with_particle_count(10));
        sim.step(0.016);
        let positions: Vec<[f32; 3]> = sim.particles().iter().map(|p| p.position.to_array()).collect();
        let instances = sim.instances();
        assert_eq!(instances.len(), 10);
        for (instance, position) in instances.iter().zip(&positions) {
            assert_eq!(&instance.position, position);
        }
    }

    #[test]
    fn test_step_without_build_initializes() {
        let mut sim = Simulation::new().with_particle_count(5);
        let result = sim.step(0.016);
        assert_eq!(result.particles.len(), 5);
        assert_eq!(result.frame, 1);
    }
}
