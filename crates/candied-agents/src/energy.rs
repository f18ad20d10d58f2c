//! Per-tick energy cost model.
//!
//! Every tick a creature acts, it pays the sum of three independent terms:
//!
//! - movement: `kinetic_cost_factor * speed^2`
//! - focus: `focus_cost_factor / tan(focus_angle / 2)`, diverging as the
//!   steering cone narrows
//! - view: `view_cost_factor * view_range`
//!
//! Genes never change mid-day, so the cost is computed once per day and
//! cached on the creature.

use core::f64::consts::PI;

use candied_types::Genome;

use crate::config::BehaviorConfig;

/// Smallest focus angle used for costing and steering.
///
/// Mutation can drive `focus_angle` to zero or below, where the focus term
/// is singular; such genomes are treated as having this (very expensive)
/// focus instead.
pub const MIN_FOCUS_ANGLE: f64 = 1e-3;

/// Focus angle actually used by the cost model, clamped into
/// `[MIN_FOCUS_ANGLE, PI]`.
pub fn effective_focus(focus_angle: f64) -> f64 {
    if focus_angle.is_nan() {
        MIN_FOCUS_ANGLE
    } else {
        focus_angle.clamp(MIN_FOCUS_ANGLE, PI)
    }
}

/// Energy paid for one tick of activity, split by category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickCost {
    /// Kinetic term.
    pub movement: f64,
    /// Focus term.
    pub focus: f64,
    /// View-range term.
    pub view: f64,
}

impl TickCost {
    /// Sum of all three terms.
    pub fn total(&self) -> f64 {
        self.movement + self.focus + self.view
    }
}

/// Compute the per-tick cost of a genome.
///
/// Every term is non-negative: a negative `view_range` senses nothing and
/// costs nothing.
pub fn tick_cost(genome: &Genome, config: &BehaviorConfig) -> TickCost {
    let half_focus = effective_focus(genome.focus_angle) / 2.0;
    TickCost {
        movement: config.kinetic_cost_factor * genome.speed.powi(2),
        focus: config.focus_cost_factor / half_focus.tan(),
        view: config.view_cost_factor * genome.view_range.max(0.0),
    }
}
