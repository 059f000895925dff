//! Particle species for the reactive (collision theory) mode.
//!
//! Ensemble runs use [`Species::Neutral`] for every particle. Reactive runs
//! seed a mix of [`Species::ReactantA`] and [`Species::ReactantB`]; an
//! energetic enough A–B collision turns both into [`Species::Product`],
//! which is terminal:
//!
//! ```text
//! ReactantA | ReactantB --[collision with complement, above threshold]--> Product
//! ```

use crate::Vec3;
use kinetics_derive::StateTag;

/// Species tag carried by every particle.
#[derive(StateTag, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Species {
    /// The single implicit species of ensemble mode. Never reacts.
    #[default]
    Neutral,
    /// First reactant.
    ReactantA,
    /// Second reactant, complementary to `ReactantA`.
    ReactantB,
    /// Reaction product. No further transitions.
    Product,
}

impl Species {
    /// Whether this species can still undergo a transition.
    pub fn is_reactant(self) -> bool {
        match self {
            Species::ReactantA | Species::ReactantB => true,
            Species::Neutral | Species::Product => false,
        }
    }

    /// Whether a collision between `self` and `other` can produce a reaction.
    pub fn reacts_with(self, other: Species) -> bool {
        match (self, other) {
            (Species::ReactantA, Species::ReactantB) | (Species::ReactantB, Species::ReactantA) => true,
            (Species::ReactantA, _)
            | (Species::ReactantB, _)
            | (Species::Neutral, _)
            | (Species::Product, _) => false,
        }
    }

    /// Color hint for the renderer (RGB, 0.0-1.0).
    pub fn color(self) -> Vec3 {
        match self {
            Species::Neutral => Vec3::new(0.85, 0.85, 0.9),
            Species::ReactantA => Vec3::new(0.95, 0.3, 0.25),
            Species::ReactantB => Vec3::new(0.25, 0.45, 0.95),
            Species::Product => Vec3::new(0.3, 0.9, 0.4),
        }
    }
}
