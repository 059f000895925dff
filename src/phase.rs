//! Macroscopic phase labels.
//!
//! The phase is derived, never simulated: it is recomputed from the
//! temperature and pressure inputs on every call and only drives color
//! hints. There is no hysteresis, so inputs oscillating across a threshold
//! make the label flicker between neighbors.

use crate::Vec3;
use kinetics_derive::StateTag;

/// Raw temperature above which the ensemble is plasma, regardless of pressure.
pub const PLASMA_TEMPERATURE: f32 = 800.0;

/// Effective temperature above which the ensemble is a gas.
pub const GAS_TEMPERATURE: f32 = 400.0;

/// Effective temperature above which the ensemble is a liquid.
pub const LIQUID_TEMPERATURE: f32 = 200.0;

/// Effective-temperature reduction per unit of pressure.
pub const PRESSURE_WEIGHT: f32 = 2.0;

/// Phase of the ensemble.
#[derive(StateTag, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Solid,
    Liquid,
    Gas,
    Plasma,
}

impl Phase {
    /// Classify `(temperature, pressure)` into a phase.
    ///
    /// Total over all inputs: NaN comparisons are false, so NaN falls
    /// through to [`Phase::Solid`].
    pub fn classify(temperature: f32, pressure: f32) -> Phase {
        if temperature > PLASMA_TEMPERATURE {
            return Phase::Plasma;
        }
        let effective = temperature - PRESSURE_WEIGHT * pressure;
        if effective > GAS_TEMPERATURE {
            Phase::Gas
        } else if effective > LIQUID_TEMPERATURE {
            Phase::Liquid
        } else {
            Phase::Solid
        }
    }

    /// Color hint for the renderer (RGB, 0.0-1.0).
    pub fn color(self) -> Vec3 {
        match self {
            Phase::Solid => Vec3::new(0.35, 0.55, 0.95),
            Phase::Liquid => Vec3::new(0.2, 0.8, 0.85),
            Phase::Gas => Vec3::new(0.95, 0.65, 0.2),
            Phase::Plasma => Vec3::new(0.9, 0.3, 0.9),
        }
    }

    /// Lowercase display label for legends.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Solid => "solid",
            Phase::Liquid => "liquid",
            Phase::Gas => "gas",
            Phase::Plasma => "plasma",
        }
    }
}

/// Classify `(temperature, pressure)` without a simulation.
///
/// Lets a legend label the ensemble without stepping.
pub fn classify_phase(temperature: f32, pressure: f32) -> Phase {
    Phase::classify(temperature, pressure)
}
