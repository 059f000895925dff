//! Container walls and the pressure-driven piston.
//!
//! The container is an axis-aligned box. The horizontal walls (x, z) are
//! fixed at `±base.x` and `±base.z`, the floor is fixed at `-base.y`, and
//! the ceiling is a virtual piston: its height above the floor shrinks as
//! pressure rises.
//!
//! ```text
//! headroom(p) = clamp(1 / (1 + p / pressure_scale), min_headroom, 1)
//! ceiling     = floor + 2 · base.y · headroom(p)
//! ```
//!
//! `min_headroom > 0` keeps the vertical extent positive at any pressure.

use crate::particle::Particle;
use crate::Vec3;

/// Axis-aligned container with a piston ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    /// Half extents of the uncompressed box.
    pub base_half_extents: Vec3,
    /// Fraction of the normal velocity kept after a wall bounce, in (0, 1).
    pub restitution: f32,
    /// Pressure at which the headroom halves.
    pub pressure_scale: f32,
    /// Smallest headroom fraction the piston can compress to.
    pub min_headroom: f32,
    pressure: f32,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            base_half_extents: Vec3::splat(5.0),
            restitution: 0.8,
            pressure_scale: 100.0,
            min_headroom: 0.2,
            pressure: 0.0,
        }
    }
}

impl Container {
    /// Create a container with the given uncompressed half extents.
    pub fn new(base_half_extents: Vec3) -> Self {
        Self {
            base_half_extents,
            ..Default::default()
        }
    }

    /// Set the wall restitution.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Move the piston to the position implied by `pressure`.
    pub fn set_pressure(&mut self, pressure: f32) {
        self.pressure = pressure;
    }

    /// Current pressure input.
    #[inline]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Fraction of the full height left below the piston.
    pub fn headroom(&self) -> f32 {
        let raw = 1.0 / (1.0 + self.pressure / self.pressure_scale);
        raw.clamp(self.min_headroom, 1.0)
    }

    /// Fixed floor height.
    #[inline]
    pub fn floor(&self) -> f32 {
        -self.base_half_extents.y
    }

    /// Piston height.
    #[inline]
    pub fn ceiling(&self) -> f32 {
        self.floor() + 2.0 * self.base_half_extents.y * self.headroom()
    }

    /// Half extents of the current (possibly compressed) box, measured from
    /// [`center`](Self::center).
    ///
    /// The floor stays put while the piston descends, so under pressure the
    /// box is no longer centered on the origin and `|p.y|` may exceed
    /// `half_extents().y` for a contained particle. Use `p - center()` or
    /// [`contains`](Self::contains).
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(
            self.base_half_extents.x,
            self.base_half_extents.y * self.headroom(),
            self.base_half_extents.z,
        )
    }

    /// Center of the current box.
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, self.floor() + self.base_half_extents.y * self.headroom(), 0.0)
    }

    /// Lower corner of the current box.
    #[inline]
    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(-self.base_half_extents.x, self.floor(), -self.base_half_extents.z)
    }

    /// Upper corner of the current box.
    #[inline]
    pub fn max_corner(&self) -> Vec3 {
        Vec3::new(self.base_half_extents.x, self.ceiling(), self.base_half_extents.z)
    }

    /// Whether `position` lies inside the current box (walls included).
    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min_corner()).all() && position.cmple(self.max_corner()).all()
    }

    /// Nearest point inside the current box.
    pub fn clamp_position(&self, position: Vec3) -> Vec3 {
        position.clamp(self.min_corner(), self.max_corner())
    }

    /// Bounce `particle` off any wall it has crossed.
    ///
    /// The position is clamped onto the wall and an outward velocity
    /// component is reversed and damped by `restitution`. A particle sitting
    /// exactly on a wall with no outward velocity is left untouched, so
    /// repeated calls are idempotent. Returns `true` if a wall was hit.
    pub fn reflect(&self, particle: &mut Particle) -> bool {
        let lo = self.min_corner();
        let hi = self.max_corner();
        let mut hit = false;

        for axis in 0..3 {
            let p = particle.position[axis];
            if p < lo[axis] {
                particle.position[axis] = lo[axis];
                if particle.velocity[axis] < 0.0 {
                    particle.velocity[axis] *= -self.restitution;
                }
                hit = true;
            } else if p > hi[axis] {
                particle.position[axis] = hi[axis];
                if particle.velocity[axis] > 0.0 {
                    particle.velocity[axis] *= -self.restitution;
                }
                hit = true;
            }
        }

        hit
    }
}
