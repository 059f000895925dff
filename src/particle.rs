//! The simulated particle.

use crate::species::Species;
use crate::Vec3;

/// A single simulated particle. Mass is implicitly 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Species tag. `Neutral` in ensemble mode.
    pub species: Species,
}

impl Particle {
    /// A neutral particle.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            species: Species::Neutral,
        }
    }

    /// A particle of the given species.
    pub fn with_species(position: Vec3, velocity: Vec3, species: Species) -> Self {
        Self {
            position,
            velocity,
            species,
        }
    }

    /// Speed (velocity magnitude).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Kinetic energy for unit mass.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.velocity.length_squared()
    }
}
