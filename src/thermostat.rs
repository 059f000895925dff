//! Loose velocity thermostat.
//!
//! Each particle is nudged toward a target speed proportional to the
//! temperature input:
//!
//! - slower than the target: add an isotropic random kick of size
//!   `target · thermal_factor` (stochastic heating);
//! - at or above the target: multiply the velocity by `cooling` (damping).
//!
//! This is deliberately not a Berendsen or Nosé–Hoover scheme and does not
//! produce a canonical ensemble. It only has to make the ensemble visibly
//! follow the temperature slider within a few frames.

use crate::particle::Particle;
use crate::spawn::random_unit_vector;
use rand::Rng;

/// Thermostat parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thermostat {
    /// Target speed per degree of temperature.
    pub speed_per_degree: f32,
    /// Heating kick size as a fraction of the target speed.
    pub thermal_factor: f32,
    /// Velocity multiplier applied when at or above the target speed.
    pub cooling: f32,
}

impl Default for Thermostat {
    fn default() -> Self {
        Self {
            speed_per_degree: 0.01,
            thermal_factor: 0.1,
            cooling: 0.99,
        }
    }
}

impl Thermostat {
    /// Speed the thermostat steers toward at `temperature`.
    #[inline]
    pub fn target_speed(&self, temperature: f32) -> f32 {
        self.speed_per_degree * temperature.max(0.0)
    }

    /// Temperature whose target speed equals `speed`.
    ///
    /// Inverse of [`Thermostat::target_speed`], used for readouts.
    #[inline]
    pub fn temperature_for_speed(&self, speed: f32) -> f32 {
        if self.speed_per_degree > 0.0 {
            speed / self.speed_per_degree
        } else {
            0.0
        }
    }

    /// Nudge one particle toward the target speed for `temperature`.
    ///
    /// Returns `true` if the particle was heated, `false` if it was damped.
    pub fn apply<R: Rng + ?Sized>(&self, particle: &mut Particle, temperature: f32, rng: &mut R) -> bool {
        let target = self.target_speed(temperature);
        if particle.speed() < target {
            particle.velocity += random_unit_vector(rng) * (target * self.thermal_factor);
            true
        } else {
            particle.velocity *= self.cooling;
            false
        }
    }

    /// Set the target speed per degree.
    pub fn with_speed_per_degree(mut self, speed_per_degree: f32) -> Self {
        self.speed_per_degree = speed_per_degree;
        self
    }

    /// Set the heating kick fraction.
    pub fn with_thermal_factor(mut self, thermal_factor: f32) -> Self {
        self.thermal_factor = thermal_factor;
        self
    }

    /// Set the cooling multiplier.
    pub fn with_cooling(mut self, cooling: f32) -> Self {
        self.cooling = cooling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_target_speed_scales_with_temperature() {
        let thermostat = Thermostat::default();
        assert_relative_eq!(thermostat.target_speed(300.0), 3.0, epsilon = 1e-5);
        assert_eq!(thermostat.target_speed(-10.0), 0.0);
        assert_relative_eq!(thermostat.temperature_for_speed(3.0), 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fast_particles_are_damped() {
        let thermostat = Thermostat::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(!thermostat.apply(&mut p, 300.0, &mut rng));
        assert_relative_eq!(p.velocity.x, 9.9, epsilon = 1e-5);
    }

    #[test]
    fn test_slow_particles_are_heated() {
        let thermostat = Thermostat::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO);
        assert!(thermostat.apply(&mut p, 500.0, &mut rng));
        // One kick of target * factor = 5 * 0.1
        assert_relative_eq!(p.speed(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_ensemble_tracks_target() {
        let thermostat = Thermostat::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut particles = vec![Particle::default(); 200];

        for _ in 0..400 {
            for p in &mut particles {
                thermostat.apply(p, 400.0, &mut rng);
            }
        }

        let mean_speed = particles.iter().map(Particle::speed).sum::<f32>() / particles.len() as f32;
        // Target is 4.0; the loose rule hovers around it.
        assert!(mean_speed > 3.0 && mean_speed < 5.0, "mean speed {}", mean_speed);
    }

    #[test]
    fn test_zero_temperature_cools_to_rest() {
        let thermostat = Thermostat::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        for _ in 0..2000 {
            thermostat.apply(&mut p, 0.0, &mut rng);
        }
        assert!(p.speed() < 1e-6);
    }
}
