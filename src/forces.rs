//! Short-range pairwise force law.
//!
//! # Sign convention
//!
//! [`ForceModel::force_magnitude`] is **positive for attraction** (pull the
//! pair together) and **negative for repulsion** (push the pair apart). The
//! scalar is applied along the unit vector from particle `i` to particle `j`:
//! `forces[i] += f·n̂`, `forces[j] -= f·n̂`.
//!
//! The law is piecewise linear around an equilibrium distance `σ`:
//!
//! ```text
//!            r < min_distance : 0
//! min_distance ≤ r < σ        : -repulsion · (σ - r)
//!            σ ≤ r < cutoff   :  attraction · (r - σ)
//!       cutoff ≤ r            : 0
//! ```
//!
//! The steep repulsive branch stands in for hard-sphere exclusion. The
//! constants are tuned for visual plausibility, not taken from a real
//! potential.

use crate::spatial::SpatialGrid;
use crate::Vec3;

/// Pairwise force parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceModel {
    /// Equilibrium distance `σ` where the force changes sign.
    pub equilibrium: f32,
    /// Interaction cutoff radius. Also the spatial grid cell size.
    pub cutoff: f32,
    /// Repulsive coefficient below `σ`.
    pub repulsion: f32,
    /// Attractive coefficient between `σ` and the cutoff.
    pub attraction: f32,
    /// Pairs closer than this are skipped to avoid dividing by ~0.
    pub min_distance: f32,
    /// Above this temperature the pairwise force is switched off entirely.
    pub disable_above_temperature: f32,
}

impl Default for ForceModel {
    fn default() -> Self {
        Self {
            equilibrium: 0.6,
            cutoff: 1.2,
            repulsion: 400.0,
            attraction: 2.0,
            min_distance: 1.0e-3,
            disable_above_temperature: 800.0,
        }
    }
}

impl ForceModel {
    /// Signed force magnitude at distance `r` (positive = attractive).
    pub fn force_magnitude(&self, r: f32) -> f32 {
        if r.is_nan() || r < self.min_distance || r >= self.cutoff {
            0.0
        } else if r < self.equilibrium {
            -self.repulsion * (self.equilibrium - r)
        } else {
            self.attraction * (r - self.equilibrium)
        }
    }

    /// Force vector on the particle at `pi` due to the one at `pj`.
    ///
    /// The particle at `pj` receives the exact negation. Returns `None` when
    /// the pair is out of range or too close to define a direction.
    pub fn pair_force(&self, pi: Vec3, pj: Vec3) -> Option<Vec3> {
        let delta = pj - pi;
        let r = delta.length();
        let f = self.force_magnitude(r);
        if f == 0.0 {
            return None;
        }
        Some(delta * (f / r))
    }

    /// Whether pairwise forces apply at `temperature`.
    ///
    /// Above the threshold particles move ballistically apart from wall
    /// reflections (the plasma-like regime).
    #[inline]
    pub fn enabled_at(&self, temperature: f32) -> bool {
        temperature <= self.disable_above_temperature
    }

    /// Zero `forces` and accumulate every pairwise contribution.
    ///
    /// `grid` must have been rebuilt from `positions` with a cell size of at
    /// least `cutoff`. Returns the number of interacting pairs.
    pub fn accumulate(&self, positions: &[Vec3], grid: &SpatialGrid, forces: &mut Vec<Vec3>) -> usize {
        debug_assert!(grid.cell_size() >= self.cutoff);
        forces.clear();
        forces.resize(positions.len(), Vec3::ZERO);

        let mut pairs = 0;
        grid.for_each_candidate_pair(|i, j| {
            if let Some(force) = self.pair_force(positions[i], positions[j]) {
                forces[i] += force;
                forces[j] -= force;
                pairs += 1;
            }
        });
        pairs
    }

    /// Set the equilibrium distance.
    pub fn with_equilibrium(mut self, equilibrium: f32) -> Self {
        self.equilibrium = equilibrium;
        self
    }

    /// Set the cutoff radius.
    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the repulsive and attractive coefficients.
    pub fn with_coefficients(mut self, repulsion: f32, attraction: f32) -> Self {
        self.repulsion = repulsion;
        self.attraction = attraction;
        self
    }

    /// Set the temperature above which forces switch off.
    pub fn with_disable_above(mut self, temperature: f32) -> Self {
        self.disable_above_temperature = temperature;
        self
    }
}
