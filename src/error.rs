//! Error types for kinetics.
//!
//! The core has a narrow failure surface: every input is a bounded UI value,
//! so the only fault class is an out-of-range configuration. Stepping never
//! fails.

use std::fmt;

/// Broad classification of a [`ConfigError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration value was outside its supported range. The previous
    /// configuration stays in effect.
    InvalidConfiguration,
}

/// Errors that can occur when configuring a simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Particle count must be at least one.
    InvalidParticleCount(usize),
    /// Particle count above the supported real-time maximum.
    TooManyParticles {
        /// Requested count.
        requested: usize,
        /// Largest supported count.
        max: usize,
    },
    /// Temperature must be finite and non-negative.
    InvalidTemperature(f32),
    /// Pressure must be finite and non-negative.
    InvalidPressure(f32),
    /// Restitution must lie strictly between 0 and 1.
    InvalidRestitution(f32),
    /// Reactant ratio must lie in `[0, 1]`.
    InvalidRatio(f32),
    /// Activation energy must be finite and non-negative.
    InvalidActivationEnergy(f32),
    /// Container half extents must lie in `(0, MAX_HALF_EXTENT]` on every axis.
    InvalidBounds([f32; 3]),
}

impl ConfigError {
    /// The error kind, for hosts that only branch on the class of failure.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParticleCount(n) => {
                write!(f, "Invalid configuration: particle count must be > 0 (got {})", n)
            }
            ConfigError::TooManyParticles { requested, max } => write!(
                f,
                "Invalid configuration: {} particles requested, at most {} are supported",
                requested, max
            ),
            ConfigError::InvalidTemperature(t) => {
                write!(f, "Invalid configuration: temperature must be finite and >= 0 (got {})", t)
            }
            ConfigError::InvalidPressure(p) => {
                write!(f, "Invalid configuration: pressure must be finite and >= 0 (got {})", p)
            }
            ConfigError::InvalidRestitution(r) => {
                write!(f, "Invalid configuration: restitution must be in (0, 1) (got {})", r)
            }
            ConfigError::InvalidRatio(r) => {
                write!(f, "Invalid configuration: reactant ratio must be in [0, 1] (got {})", r)
            }
            ConfigError::InvalidActivationEnergy(e) => write!(
                f,
                "Invalid configuration: activation energy must be finite and >= 0 (got {})",
                e
            ),
            ConfigError::InvalidBounds(b) => write!(
                f,
                "Invalid configuration: container half extents must be in (0, {}] (got {:?})",
                crate::config::MAX_HALF_EXTENT,
                b
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result alias used by configuration entry points.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_value() {
        let err = ConfigError::InvalidRestitution(1.5);
        let msg = err.to_string();
        assert!(msg.contains("restitution"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_every_error_is_invalid_configuration() {
        let errors = [
            ConfigError::InvalidParticleCount(0),
            ConfigError::TooManyParticles { requested: 10_000, max: 4096 },
            ConfigError::InvalidTemperature(-1.0),
            ConfigError::InvalidPressure(f32::NAN),
            ConfigError::InvalidBounds([0.0, 1.0, 1.0]),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }
    }
}
