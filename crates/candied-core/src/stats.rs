//! Per-day statistics.
//!
//! The collector samples once per day, after the scheduler has run and
//! before evolve changes the population. It produces one [`ModelRow`] with
//! population aggregates and, when enabled, one [`AgentRow`] per live agent.
//!
//! Means over an empty population are NaN; downstream aggregation treats
//! such rows as a dead population.

use candied_agents::{Candy, Creature};
use candied_types::{AgentKind, AgentRow, ModelRow};

use crate::evolution::count;
use crate::population::Population;

/// Accumulates the rows sampled over a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsCollector {
    collect_agents: bool,
    model_rows: Vec<ModelRow>,
    agent_rows: Vec<AgentRow>,
}

impl StatsCollector {
    /// Create an empty collector; `collect_agents` enables agent rows.
    pub const fn new(collect_agents: bool) -> Self {
        Self {
            collect_agents,
            model_rows: Vec::new(),
            agent_rows: Vec::new(),
        }
    }

    /// Sample `population` for `day` and return the model row.
    pub fn collect(&mut self, day: u32, population: &Population) -> ModelRow {
        let row = model_row(day, population);
        self.model_rows.push(row);
        if self.collect_agents {
            self.agent_rows.extend(agent_rows(day, population));
        }
        row
    }

    /// Model rows, one per simulated day.
    pub fn model_rows(&self) -> &[ModelRow] {
        &self.model_rows
    }

    /// Agent rows, one per live agent per simulated day.
    pub fn agent_rows(&self) -> &[AgentRow] {
        &self.agent_rows
    }

    /// Split into model and agent rows.
    pub fn into_rows(self) -> (Vec<ModelRow>, Vec<AgentRow>) {
        (self.model_rows, self.agent_rows)
    }
}

/// Population aggregates for one day.
pub fn model_row(day: u32, population: &Population) -> ModelRow {
    let creatures = population.creatures();
    let eaters = |n: u8| count(creatures.values().filter(|c| c.eaten_candies == n).count());

    ModelRow {
        day,
        n_creatures: count(creatures.len()),
        n_candies: count(population.candy_count()),
        mean_energy: mean(creatures.values().map(|c| c.energy)),
        mean_speed: mean(creatures.values().map(|c| c.genome.speed)),
        mean_view_range: mean(creatures.values().map(|c| c.genome.view_range)),
        mean_focus_angle: mean(creatures.values().map(|c| c.genome.focus_angle)),
        mean_mut_rate: mean(creatures.values().map(|c| c.genome.mut_rate)),
        count_eaten_0: eaters(0),
        count_eaten_1: eaters(1),
        count_eaten_2: eaters(2),
    }
}

/// One row per live agent, creatures first, each group in id order.
pub fn agent_rows(day: u32, population: &Population) -> Vec<AgentRow> {
    population
        .creatures()
        .values()
        .map(|creature| creature_row(day, creature))
        .chain(
            population
                .candies()
                .values()
                .map(|candy: &Candy| AgentRow::candy(day, candy.id)),
        )
        .collect()
}

fn creature_row(day: u32, creature: &Creature) -> AgentRow {
    let telemetry = &creature.telemetry;
    AgentRow {
        day,
        agent_id: creature.id,
        agent_type: AgentKind::Creature,
        done_steps: Some(telemetry.done_steps),
        energy_used_for_movement: Some(telemetry.energy_used_for_movement),
        energy_spent_on_view_range: Some(telemetry.energy_spent_on_view_range),
        energy_spent_on_focus_angle: Some(telemetry.energy_spent_on_focus_angle),
        energy_lost: telemetry.energy_lost,
        energy_of_happiness: telemetry.energy_of_happiness,
        moment_of_first_consumption: telemetry.moment_of_first_consumption,
        moment_of_second_consumption: telemetry.moment_of_second_consumption,
        eaten_candies: Some(creature.eaten_candies),
        age: Some(creature.age),
        penalty: Some(creature.penalty),
    }
}

/// Arithmetic mean; NaN for an empty input.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0_u32), |(sum, n), v| (sum + v, n.saturating_add(1)));
    if n == 0 {
        f64::NAN
    } else {
        sum / f64::from(n)
    }
}
