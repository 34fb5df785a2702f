//! Configuration for the cycle-advance setup.
//!
//! Contradictory or unphysical parameters are rejected by [`RolloverConfig::validate`]
//! before any schedule is built; values are never silently clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, fatal at schedule-construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Non-positive duration: {name} = {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },

    #[error("Non-positive length: {name} = {value}")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("end_stp_frac must lie in (0, 0.5), got {0}")]
    EndStepFraction(f64),

    #[error("Increment count must be positive: {name} = 0")]
    ZeroIncrementCount { name: &'static str },

    #[error("nom_num_incr_rolling ({nominal}) exceeds max_num_incr_rolling ({max})")]
    IncrementBounds { nominal: usize, max: usize },
}

/// Restart strategy selector for the move-back between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnMethod {
    /// Single step-function return stage straight into rolling.
    Quick,
    /// Lift out of contact, return, lower back and ramp into rolling.
    Full,
    /// Quick return plus an explicit load re-application stage.
    Reapply,
}

/// Timing parameters of one rolling pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingParams {
    /// Duration of the rolling pass.
    pub time: f64,
    /// Total rolling rotation per pass (radians).
    pub angle: f64,
    /// Total rolling translation per pass.
    pub length: f64,
    /// Fraction of `time` spent in each of the ramp-in/ramp-out stages
    /// (full move-back strategy).
    pub end_stp_frac: f64,
}

/// Increment-control parameters for the rolling stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementParams {
    /// Nominal number of increments over the rolling stage.
    pub nom_num_incr_rolling: usize,
    /// Hard cap on the number of increments.
    pub max_num_incr_rolling: usize,
}

/// Complete cycle-advance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverConfig {
    /// Which restart strategy to build.
    pub return_method: ReturnMethod,
    /// Lock rail contact-node velocity during the non-rolling stages.
    pub lock_rail: bool,
    /// Rolling pass timing.
    pub rolling: RollingParams,
    /// Increment control for the rolling stage.
    pub increments: IncrementParams,
    /// Maximum extent of the contact patch along the rolling direction.
    pub max_contact_length: f64,
}

impl Default for RolloverConfig {
    fn default() -> Self {
        Self {
            return_method: ReturnMethod::Reapply,
            lock_rail: true,
            rolling: RollingParams {
                time: 1.0,
                angle: 0.1,
                length: 0.05,
                end_stp_frac: 0.05,
            },
            increments: IncrementParams {
                nom_num_incr_rolling: 100,
                max_num_incr_rolling: 1000,
            },
            max_contact_length: 0.01,
        }
    }
}

impl RolloverConfig {
    /// Check the configuration for contradictory or unphysical values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling.time <= 0.0 {
            return Err(ConfigError::NonPositiveDuration {
                name: "rolling.time",
                value: self.rolling.time,
            });
        }
        if self.rolling.length <= 0.0 {
            return Err(ConfigError::NonPositiveLength {
                name: "rolling.length",
                value: self.rolling.length,
            });
        }
        if self.max_contact_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength {
                name: "max_contact_length",
                value: self.max_contact_length,
            });
        }
        if !(self.rolling.end_stp_frac > 0.0 && self.rolling.end_stp_frac < 0.5) {
            return Err(ConfigError::EndStepFraction(self.rolling.end_stp_frac));
        }
        if self.increments.nom_num_incr_rolling == 0 {
            return Err(ConfigError::ZeroIncrementCount {
                name: "nom_num_incr_rolling",
            });
        }
        if self.increments.max_num_incr_rolling == 0 {
            return Err(ConfigError::ZeroIncrementCount {
                name: "max_num_incr_rolling",
            });
        }
        if self.increments.nom_num_incr_rolling > self.increments.max_num_incr_rolling {
            return Err(ConfigError::IncrementBounds {
                nominal: self.increments.nom_num_incr_rolling,
                max: self.increments.max_num_incr_rolling,
            });
        }
        Ok(())
    }
}
