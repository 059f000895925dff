//! Explicit time integration.
//!
//! A semi-implicit Euler step: velocity first, then position from the new
//! velocity. Mass is 1 for every particle. The step is only stable for small
//! `dt`, so [`Integrator::clamp_dt`] caps the host frame time at `max_dt`.
//! Feeding larger, uncapped steps into this scheme injects energy and can
//! make the ensemble explode.

use crate::particle::Particle;
use crate::Vec3;

/// Integration and stability parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Integrator {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Gravity only applies below this temperature.
    pub gravity_max_temperature: f32,
    /// Largest timestep ever integrated, in seconds.
    pub max_dt: f32,
    /// Speed clamp applied every step.
    pub max_speed: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            gravity: 4.0,
            gravity_max_temperature: 400.0,
            max_dt: 1.0 / 30.0,
            max_speed: 20.0,
        }
    }
}

impl Integrator {
    /// Cap a host-supplied timestep at `max_dt`.
    #[inline]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        dt.min(self.max_dt)
    }

    /// Whether gravity acts at `temperature`.
    #[inline]
    pub fn gravity_active(&self, temperature: f32) -> bool {
        temperature < self.gravity_max_temperature
    }

    /// Advance one particle by `dt` under `force`.
    pub fn integrate(&self, particle: &mut Particle, force: Vec3, dt: f32, temperature: f32) {
        particle.velocity += force * dt;
        if self.gravity_active(temperature) {
            particle.velocity.y -= self.gravity * dt;
        }
        particle.position += particle.velocity * dt;
    }

    /// Repair non-finite state and clamp the speed to `max_speed`.
    ///
    /// A non-finite velocity is zeroed and a non-finite position is moved to
    /// `fallback`. Returns `true` if anything other than the speed clamp was
    /// corrected.
    pub fn stabilize(&self, particle: &mut Particle, fallback: Vec3) -> bool {
        let mut repaired = false;
        if !particle.velocity.is_finite() {
            particle.velocity = Vec3::ZERO;
            repaired = true;
        }
        if !particle.position.is_finite() {
            particle.position = fallback;
            repaired = true;
        }
        particle.velocity = particle.velocity.clamp_length_max(self.max_speed);
        repaired
    }

    /// Set the gravity strength.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the temperature above which gravity switches off.
    pub fn with_gravity_max_temperature(mut self, temperature: f32) -> Self {
        self.gravity_max_temperature = temperature;
        self
    }

    /// Set the largest integrated timestep.
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Set the speed clamp.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }
}
