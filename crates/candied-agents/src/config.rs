//! Tunable constants for creature behavior.
//!
//! Cost coefficients and the capture radius have varied between releases of
//! the model, so none of them is hard-coded. [`BehaviorConfig`] bundles every
//! tunable; it is read from the `behavior` key of the simulation config and
//! passed down into the per-tick handlers.

use core::f64::consts::FRAC_PI_2;

use serde::Deserialize;

use crate::error::AgentError;

/// Configuration for per-tick creature behavior and end-of-day judgement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    /// Multiplier on `speed^2` in the per-tick cost (default: 1.0).
    #[serde(default = "default_kinetic_cost_factor")]
    pub kinetic_cost_factor: f64,

    /// Multiplier on `1 / tan(focus_angle / 2)` in the per-tick cost (default: 1.0).
    #[serde(default = "default_focus_cost_factor")]
    pub focus_cost_factor: f64,

    /// Multiplier on `view_range` in the per-tick cost (default: 5.0).
    #[serde(default = "default_view_cost_factor")]
    pub view_cost_factor: f64,

    /// Capture radius as a multiple of speed (default: 2.0).
    ///
    /// A creature eats its target when it ends a tick strictly closer than
    /// `capture_radius_factor * speed`.
    #[serde(default = "default_capture_radius_factor")]
    pub capture_radius_factor: f64,

    /// Penalty added for surviving a day on a single candy (default: 0.25).
    #[serde(default = "default_penalty_step")]
    pub penalty_step: f64,

    /// Accumulated penalty at which a creature dies (default: 0.999999).
    ///
    /// Slightly below 1 so that four 0.25 steps always reach it despite
    /// float accumulation.
    #[serde(default = "default_penalty_death_threshold")]
    pub penalty_death_threshold: f64,

    /// Half-width of the random turn taken while wandering (default: PI/2).
    #[serde(default = "default_wander_half_angle")]
    pub wander_half_angle: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            kinetic_cost_factor: default_kinetic_cost_factor(),
            focus_cost_factor: default_focus_cost_factor(),
            view_cost_factor: default_view_cost_factor(),
            capture_radius_factor: default_capture_radius_factor(),
            penalty_step: default_penalty_step(),
            penalty_death_threshold: default_penalty_death_threshold(),
            wander_half_angle: default_wander_half_angle(),
        }
    }
}

impl BehaviorConfig {
    /// Check that every constant is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidBehavior`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AgentError> {
        let non_negative = [
            ("kinetic_cost_factor", self.kinetic_cost_factor),
            ("focus_cost_factor", self.focus_cost_factor),
            ("view_cost_factor", self.view_cost_factor),
            ("capture_radius_factor", self.capture_radius_factor),
            ("penalty_step", self.penalty_step),
            ("wander_half_angle", self.wander_half_angle),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AgentError::InvalidBehavior {
                    field,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }

        let threshold = self.penalty_death_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(AgentError::InvalidBehavior {
                field: "penalty_death_threshold",
                value: threshold,
                reason: "must lie in (0, 1]",
            });
        }
        Ok(())
    }
}

const fn default_kinetic_cost_factor() -> f64 {
    1.0
}

const fn default_focus_cost_factor() -> f64 {
    1.0
}

const fn default_view_cost_factor() -> f64 {
    5.0
}

const fn default_capture_radius_factor() -> f64 {
    2.0
}

const fn default_penalty_step() -> f64 {
    0.25
}

const fn default_penalty_death_threshold() -> f64 {
    0.999_999
}

const fn default_wander_half_angle() -> f64 {
    FRAC_PI_2
}
