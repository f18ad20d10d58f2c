//! Tabular rows produced by the statistics collector.
//!
//! One [`ModelRow`] is sampled per simulated day, one [`AgentRow`] per live
//! agent per day. Candy rows leave every creature-only field as `None` so
//! that both kinds share a single schema.

use serde::{Deserialize, Serialize};

use crate::enums::AgentKind;
use crate::ids::AgentId;

/// Column names of a [`ModelRow`], in [`ModelRow::values`] order.
pub const MODEL_COLUMNS: [&str; 11] = [
    "day",
    "n_creatures",
    "n_candies",
    "mean_energy",
    "mean_speed",
    "mean_view_range",
    "mean_focus_angle",
    "mean_mut_rate",
    "count_eaten_0",
    "count_eaten_1",
    "count_eaten_2",
];

/// Population-level aggregates for one day.
///
/// Means over an empty population are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    /// Day the sample belongs to (1-based).
    pub day: u32,
    /// Live creatures at sampling time.
    pub n_creatures: u32,
    /// Candies present at sampling time.
    pub n_candies: u32,
    /// Mean remaining energy.
    pub mean_energy: f64,
    /// Mean speed gene.
    pub mean_speed: f64,
    /// Mean view range gene.
    pub mean_view_range: f64,
    /// Mean focus angle gene.
    pub mean_focus_angle: f64,
    /// Mean mutation rate gene.
    pub mean_mut_rate: f64,
    /// Creatures that ate nothing.
    pub count_eaten_0: u32,
    /// Creatures that ate one candy.
    pub count_eaten_1: u32,
    /// Creatures that ate two candies.
    pub count_eaten_2: u32,
}

impl ModelRow {
    /// Whether the population was extinct when this row was sampled.
    pub const fn is_dead_population(&self) -> bool {
        self.n_creatures == 0
    }

    /// Return every column as a float, in [`MODEL_COLUMNS`] order.
    pub fn values(&self) -> [f64; MODEL_COLUMNS.len()] {
        [
            f64::from(self.day),
            f64::from(self.n_creatures),
            f64::from(self.n_candies),
            self.mean_energy,
            self.mean_speed,
            self.mean_view_range,
            self.mean_focus_angle,
            self.mean_mut_rate,
            f64::from(self.count_eaten_0),
            f64::from(self.count_eaten_1),
            f64::from(self.count_eaten_2),
        ]
    }
}

/// Per-agent telemetry for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRow {
    /// Day the sample belongs to (1-based).
    pub day: u32,
    /// The sampled agent.
    pub agent_id: AgentId,
    /// Creature or candy.
    pub agent_type: AgentKind,
    /// Ticks in which the creature moved.
    pub done_steps: Option<u32>,
    /// Energy spent on the kinetic term.
    pub energy_used_for_movement: Option<f64>,
    /// Energy spent on the view-range term.
    pub energy_spent_on_view_range: Option<f64>,
    /// Energy spent on the focus term.
    pub energy_spent_on_focus_angle: Option<f64>,
    /// Energy left unused by a creature that ate fewer than two candies.
    pub energy_lost: Option<f64>,
    /// Energy left over by a creature that ate two candies.
    pub energy_of_happiness: Option<f64>,
    /// Step count at which the first candy was eaten.
    pub moment_of_first_consumption: Option<u32>,
    /// Step count at which the second candy was eaten.
    pub moment_of_second_consumption: Option<u32>,
    /// Candies eaten today.
    pub eaten_candies: Option<u8>,
    /// Days survived.
    pub age: Option<u32>,
    /// Fraction of energy withheld at the start of the next day.
    pub penalty: Option<f64>,
}

impl AgentRow {
    /// Build a candy row: every creature-only field is `None`.
    pub const fn candy(day: u32, agent_id: AgentId) -> Self {
        Self {
            day,
            agent_id,
            agent_type: AgentKind::Candy,
            done_steps: None,
            energy_used_for_movement: None,
            energy_spent_on_view_range: None,
            energy_spent_on_focus_angle: None,
            energy_lost: None,
            energy_of_happiness: None,
            moment_of_first_consumption: None,
            moment_of_second_consumption: None,
            eaten_candies: None,
            age: None,
            penalty: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn candy_row_serializes_nulls() {
        let row = AgentRow::candy(3, AgentId::from_raw(9));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["agent_type"], "Candy");
        assert!(json["done_steps"].is_null());
        assert!(json["energy_of_happiness"].is_null());
    }

    #[test]
    fn model_values_match_columns() {
        let row = ModelRow {
            day: 2,
            n_creatures: 4,
            n_candies: 10,
            mean_energy: 12.5,
            mean_speed: 1.0,
            mean_view_range: 2.0,
            mean_focus_angle: 0.5,
            mean_mut_rate: 0.1,
            count_eaten_0: 1,
            count_eaten_1: 1,
            count_eaten_2: 2,
        };
        let values = row.values();
        assert_eq!(values.len(), MODEL_COLUMNS.len());
        assert!((values[3] - 12.5).abs() < f64::EPSILON);
        assert!((values[10] - 2.0).abs() < f64::EPSILON);
        assert!(!row.is_dead_population());
    }
}
