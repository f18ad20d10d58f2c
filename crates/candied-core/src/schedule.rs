//! Staged activation: how one simulated day is executed.
//!
//! A day is the ordered stage list
//!
//! ```text
//! [PrepareForNewDay] + [Compete] x max_steps_per_day + [Report]
//! ```
//!
//! Each stage visits every live agent exactly once. The visiting order is
//! reshuffled for every stage, so no agent keeps a first-mover advantage
//! across the ticks of a day. Stages run strictly one after another; within
//! a stage agents act sequentially on the shared state.
//!
//! Dispatch is by agent kind: creatures run their handler for the stage,
//! candies run their no-op handlers.

use candied_agents::{BehaviorConfig, TickOutcome};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::evolution::EvolutionError;
use crate::population::{AgentHandle, Population};

/// One named phase of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reset per-day state and refill energy.
    PrepareForNewDay,
    /// One sense, expend, move, eat tick.
    Compete,
    /// Settle leftover energy and age.
    Report,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PrepareForNewDay => write!(f, "prepare_for_new_day"),
            Self::Compete => write!(f, "compete"),
            Self::Report => write!(f, "report"),
        }
    }
}

/// What happened over one scheduled day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayActivity {
    /// Creature moves across all compete stages.
    pub moves: u32,
    /// Candies eaten across all compete stages.
    pub candies_eaten: u32,
}

/// Runs the stage list of a day over a [`Population`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedScheduler {
    stages: Vec<Stage>,
}

impl StagedScheduler {
    /// Build the stage list for days of `max_steps_per_day` ticks.
    pub fn new(max_steps_per_day: u32) -> Self {
        let ticks = usize::try_from(max_steps_per_day).unwrap_or(usize::MAX);
        let stages = core::iter::once(Stage::PrepareForNewDay)
            .chain(core::iter::repeat_n(Stage::Compete, ticks))
            .chain(core::iter::once(Stage::Report))
            .collect();
        Self { stages }
    }

    /// The ordered stage list.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage of one day.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Agent`] if a creature handler fails, or
    /// [`EvolutionError::UnknownAgent`] if a handle outlives its agent.
    pub fn run_day(
        &self,
        population: &mut Population,
        max_energy: f64,
        behavior: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Result<DayActivity, EvolutionError> {
        self.run_day_observed(population, max_energy, behavior, rng, |_, _| {})
    }

    /// [`Self::run_day`], handing `observe` each stage's visiting order
    /// before the stage runs.
    fn run_day_observed(
        &self,
        population: &mut Population,
        max_energy: f64,
        behavior: &BehaviorConfig,
        rng: &mut impl Rng,
        mut observe: impl FnMut(Stage, &[AgentHandle]),
    ) -> Result<DayActivity, EvolutionError> {
        let mut activity = DayActivity::default();
        for &stage in &self.stages {
            let mut handles = population.handles();
            handles.shuffle(rng);
            observe(stage, &handles);
            run_stage(stage, handles, population, max_energy, behavior, rng, &mut activity)?;
        }
        debug!(
            stages = self.stages.len(),
            moves = activity.moves,
            candies_eaten = activity.candies_eaten,
            "Day scheduled"
        );
        Ok(activity)
    }
}

/// Visit every agent in `handles` once, in the given order.
fn run_stage(
    stage: Stage,
    handles: Vec<AgentHandle>,
    population: &mut Population,
    max_energy: f64,
    behavior: &BehaviorConfig,
    rng: &mut impl Rng,
    activity: &mut DayActivity,
) -> Result<(), EvolutionError> {
    for handle in handles {
        match handle {
            AgentHandle::Candy(id) => {
                let candy = population
                    .candies
                    .get(&id)
                    .ok_or(EvolutionError::UnknownAgent(id))?;
                match stage {
                    Stage::PrepareForNewDay => candy.prepare_for_new_day(),
                    Stage::Compete => candy.compete(),
                    Stage::Report => candy.report(),
                }
            }
            AgentHandle::Creature(id) => {
                let creature = population
                    .creatures
                    .get_mut(&id)
                    .ok_or(EvolutionError::UnknownAgent(id))?;
                match stage {
                    Stage::PrepareForNewDay => creature.prepare_for_new_day(max_energy, behavior),
                    Stage::Compete => {
                        let outcome = creature
                            .compete(&mut population.space, &mut population.candies, behavior, rng)
                            .map_err(|source| EvolutionError::Agent {
                                agent_id: id,
                                source,
                            })?;
                        match outcome {
                            TickOutcome::Idle => {}
                            TickOutcome::Moved => {
                                activity.moves = activity.moves.saturating_add(1);
                            }
                            TickOutcome::Ate(_) => {
                                activity.moves = activity.moves.saturating_add(1);
                                activity.candies_eaten = activity.candies_eaten.saturating_add(1);
                            }
                        }
                    }
                    Stage::Report => creature.report(),
                }
            }
        }
    }
    Ok(())
}
