//! GPU-ready particle records.
//!
//! The core never renders. Hosts that draw with instanced meshes upload
//! [`ParticleInstance`] slices directly:
//!
//! ```ignore
//! let bytes: &[u8] = bytemuck::cast_slice(sim.instances());
//! queue.write_buffer(&instance_buffer, 0, bytes);
//! ```
//!
//! The layout is `#[repr(C)]` with no implicit padding, 48 bytes per record.

use crate::particle::Particle;
use crate::phase::Phase;
use crate::species::Species;
use crate::Vec3;
use bytemuck::{Pod, Zeroable};

/// One particle as the renderer sees it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    /// `u32` tag of the particle's [`Species`](crate::Species).
    pub species: u32,
    pub velocity: [f32; 3],
    /// `u32` tag of the ensemble [`Phase`].
    pub phase: u32,
    /// Linear RGBA color hint.
    pub color: [f32; 4],
}

impl ParticleInstance {
    /// Pack `particle` for upload.
    ///
    /// Ensemble particles take the phase color; reactive particles take the
    /// species color.
    pub fn from_particle(particle: &Particle, phase: Phase) -> Self {
        let rgb = color_hint(particle, phase);
        Self {
            position: particle.position.to_array(),
            species: particle.species.into(),
            velocity: particle.velocity.to_array(),
            phase: phase.into(),
            color: rgb.extend(1.0).to_array(),
        }
    }
}

/// RGB color hint for `particle` in an ensemble at `phase`.
pub fn color_hint(particle: &Particle, phase: Phase) -> Vec3 {
    match particle.species {
        Species::Neutral => phase.color(),
        species => species.color(),
    }
}
