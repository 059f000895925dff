//! Binary collisions and reactions.
//!
//! Particles are equal-mass spheres of a common radius. Any pair closer
//! than `2 · radius` collides:
//!
//! 1. the two velocity vectors are swapped (an equal-mass elastic exchange);
//! 2. the pair is pushed apart along the contact normal by the overlap,
//!    half each way, so neither tunnels through the other;
//! 3. a complementary reactant pair (A meets B) whose relative speed squared
//!    exceeds `activation_energy` becomes two `Product` particles and is
//!    reported.
//!
//! `Product` is terminal: products keep colliding elastically but never
//! change species again.

use crate::particle::Particle;
use crate::spatial::SpatialGrid;
use crate::species::Species;
use crate::Vec3;

/// A pair that reacted during the current step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactedPair {
    /// Lower particle index.
    pub a: usize,
    /// Higher particle index.
    pub b: usize,
    /// Contact point, for hosts that flash a marker where the reaction happened.
    pub position: Vec3,
}

/// Outcome of testing one candidate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Contact {
    Apart,
    Elastic,
    Reacted(ReactedPair),
}

/// Per-call collision tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionCounts {
    /// Pairs that touched and exchanged velocities.
    pub contacts: usize,
    /// Pairs that reacted (a subset of `contacts`).
    pub reactions: usize,
}

/// Collision and reaction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionResolver {
    /// Radius of every particle.
    pub radius: f32,
    /// Relative speed squared a complementary pair must exceed to react.
    pub activation_energy: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            radius: 0.3,
            activation_energy: 0.05,
        }
    }
}

impl CollisionResolver {
    /// Center distance at which two particles touch.
    #[inline]
    pub fn contact_distance(&self) -> f32 {
        2.0 * self.radius
    }

    /// Resolve every contact and return the pairs that newly reacted.
    ///
    /// `grid` must have been rebuilt from the current positions with a cell
    /// size of at least [`contact_distance`](Self::contact_distance).
    pub fn resolve(&self, particles: &mut [Particle], grid: &SpatialGrid) -> Vec<ReactedPair> {
        let mut reacted = Vec::new();
        self.resolve_into(particles, grid, &mut reacted);
        reacted
    }

    /// Like [`resolve`](Self::resolve) but appends to `reacted`.
    pub fn resolve_into(
        &self,
        particles: &mut [Particle],
        grid: &SpatialGrid,
        reacted: &mut Vec<ReactedPair>,
    ) -> CollisionCounts {
        debug_assert!(grid.cell_size() >= self.contact_distance());
        let mut counts = CollisionCounts::default();
        grid.for_each_candidate_pair(|i, j| match self.collide(particles, i, j) {
            Contact::Apart => {}
            Contact::Elastic => counts.contacts += 1,
            Contact::Reacted(pair) => {
                tracing::trace!(a = pair.a, b = pair.b, "pair reacted");
                counts.contacts += 1;
                counts.reactions += 1;
                reacted.push(pair);
            }
        });
        counts
    }

    /// Collide particles `i < j` if they currently touch.
    fn collide(&self, particles: &mut [Particle], i: usize, j: usize) -> Contact {
        let contact = self.contact_distance();
        // Positions may have moved earlier in this pass, so test them live
        let delta = particles[j].position - particles[i].position;
        let dist_sq = delta.length_squared();
        if dist_sq >= contact * contact {
            return Contact::Apart;
        }

        let dist = dist_sq.sqrt();
        let normal = if dist > 1.0e-6 { delta / dist } else { Vec3::X };

        let relative = particles[i].velocity - particles[j].velocity;
        let energetic = relative.length_squared() > self.activation_energy;

        let swapped = particles[i].velocity;
        particles[i].velocity = particles[j].velocity;
        particles[j].velocity = swapped;

        let push = normal * (0.5 * (contact - dist));
        particles[i].position -= push;
        particles[j].position += push;

        if energetic && particles[i].species.reacts_with(particles[j].species) {
            particles[i].species = Species::Product;
            particles[j].species = Species::Product;
            return Contact::Reacted(ReactedPair {
                a: i,
                b: j,
                position: (particles[i].position + particles[j].position) * 0.5,
            });
        }

        Contact::Elastic
    }

    /// Set the particle radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the activation threshold on relative speed squared.
    pub fn with_activation_energy(mut self, activation_energy: f32) -> Self {
        self.activation_energy = activation_energy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_for(particles: &[Particle], resolver: &CollisionResolver) -> SpatialGrid {
        let positions: Vec<Vec3> = particles.iter().map(|p| p.position).collect();
        SpatialGrid::build(&positions, resolver.contact_distance())
    }

    #[test]
    fn test_head_on_pair_reacts() {
        let resolver = CollisionResolver::default();
        let mut particles = vec![
            Particle::with_species(Vec3::new(-0.25, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), Species::ReactantA),
            Particle::with_species(Vec3::new(0.25, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), Species::ReactantB),
        ];
        let grid = grid_for(&particles, &resolver);
        let reacted = resolver.resolve(&mut particles, &grid);

        assert_eq!(reacted.len(), 1);
        assert_eq!((reacted[0].a, reacted[0].b), (0, 1));
        assert_eq!(particles[0].species, Species::Product);
        assert_eq!(particles[1].species, Species::Product);
        // Velocities exchanged
        assert_eq!(particles[0].velocity.x, -5.0);
        assert_eq!(particles[1].velocity.x, 5.0);
        // Separated to exactly touching
        assert_relative_eq!(particles[0].position.distance(particles[1].position), 0.6, epsilon = 1e-5);
    }

    #[test]
    fn test_slow_pair_bounces_without_reacting() {
        let resolver = CollisionResolver::default();
        let mut particles = vec![
            Particle::with_species(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0), Species::ReactantA),
            Particle::with_species(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0), Species::ReactantB),
        ];
        let grid = grid_for(&particles, &resolver);
        let reacted = resolver.resolve(&mut particles, &grid);

        assert!(reacted.is_empty());
        assert_eq!(particles[0].species, Species::ReactantA);
        assert_eq!(particles[1].velocity.x, 0.1);
    }

    #[test]
    fn test_like_species_never_react() {
        let resolver = CollisionResolver::default();
        let mut particles = vec![
            Particle::with_species(Vec3::ZERO, Vec3::new(9.0, 0.0, 0.0), Species::ReactantA),
            Particle::with_species(Vec3::new(0.4, 0.0, 0.0), Vec3::new(-9.0, 0.0, 0.0), Species::ReactantA),
        ];
        let grid = grid_for(&particles, &resolver);
        assert!(resolver.resolve(&mut particles, &grid).is_empty());
        assert_eq!(particles[1].species, Species::ReactantA);
    }

    #[test]
    fn test_products_are_terminal() {
        let resolver = CollisionResolver::default();
        let mut particles = vec![
            Particle::with_species(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), Species::Product),
            Particle::with_species(Vec3::new(0.3, 0.0, 0.0), Vec3::new(-4.0, 0.0, 0.0), Species::ReactantB),
            Particle::with_species(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, -4.0, 0.0), Species::ReactantA),
        ];

        for _ in 0..20 {
            let grid = grid_for(&particles, &resolver);
            let reacted = resolver.resolve(&mut particles, &grid);
            for pair in &reacted {
                assert_ne!(pair.a, 0);
                assert_ne!(pair.b, 0);
            }
            assert_eq!(particles[0].species, Species::Product);
            // Push them back together for another round
            particles[1].position = Vec3::new(0.3, 0.0, 0.0);
            particles[2].position = Vec3::new(0.0, 0.3, 0.0);
        }
    }

    #[test]
    fn test_particle_reacts_at_most_once_per_pass() {
        let resolver = CollisionResolver::default();
        // One A touching two Bs
        let mut particles = vec![
            Particle::with_species(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Species::ReactantA),
            Particle::with_species(Vec3::new(0.5, 0.0, 0.0), Vec3::new(-3.0, 0.0, 0.0), Species::ReactantB),
            Particle::with_species(Vec3::new(-0.5, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), Species::ReactantB),
        ];
        let grid = grid_for(&particles, &resolver);
        let reacted = resolver.resolve(&mut particles, &grid);

        assert_eq!(reacted.len(), 1);
        let products = particles.iter().filter(|p| p.species == Species::Product).count();
        assert_eq!(products, 2);
    }

    #[test]
    fn test_coincident_particles_are_separated() {
        let resolver = CollisionResolver::default();
        let mut particles = vec![Particle::new(Vec3::ONE, Vec3::ZERO), Particle::new(Vec3::ONE, Vec3::ZERO)];
        let grid = grid_for(&particles, &resolver);
        resolver.resolve(&mut particles, &grid);
        assert_relative_eq!(particles[0].position.distance(particles[1].position), 0.6, epsilon = 1e-5);
    }
}
