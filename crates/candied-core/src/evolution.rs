//! The population lifecycle manager.
//!
//! [`Evolution`] owns everything one simulation instance needs: the live
//! population and its spatial index, the id allocator, the day clock, the
//! statistics collector, and a private seedable generator. Each call to
//! [`Evolution::step`] simulates one full day:
//!
//! 1. Spawn `n_candies` fresh candies at uniform random positions.
//! 2. Run the staged scheduler over every live agent.
//! 3. Sample model and agent rows.
//! 4. Evolve: judge every creature, then breed the parents.
//! 5. Sweep away every candy, eaten or not.
//! 6. Advance the day; `running` turns false at `max_days`.
//!
//! A population that dies out keeps stepping until `max_days`, producing
//! NaN means.

use candied_agents::{
    AgentError, Candy, Creature, DeathCause, Verdict, offspring_genomes, survival,
};
use candied_types::{AgentId, Genome, ModelRow, Position};
use candied_world::{Torus, WorldError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::clock::{ClockError, DayClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::ids::{IdAllocator, IdError};
use crate::population::Population;
use crate::schedule::StagedScheduler;
use crate::stats::StatsCollector;

/// Smallest spatial index cell; keeps tiny view ranges from exploding the
/// cell count.
const MIN_CELL_SIZE: f64 = 1.0;

/// Errors that can occur while constructing or stepping a simulation.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// The configuration was rejected.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Agent ids ran out.
    #[error("id error: {source}")]
    Ids {
        /// The underlying id error.
        #[from]
        source: IdError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A creature handler failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// The scheduler referenced an agent that is no longer live.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),
}

/// Outcome of the end-of-day evolve pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolveReport {
    /// Creatures removed for eating nothing.
    pub starved: u32,
    /// Creatures removed because their penalty reached the threshold.
    pub exhausted: u32,
    /// Creatures kept without reproducing.
    pub survivors: u32,
    /// Creatures that ate two candies.
    pub parents: u32,
    /// Ids of the newborn creatures.
    pub offspring: Vec<AgentId>,
}

/// Summary of one simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// The day that was simulated (1-based).
    pub day: u32,
    /// Live creatures when the day began.
    pub creatures_at_dawn: u32,
    /// Live creatures after evolve, including newborns.
    pub creatures_at_dusk: u32,
    /// Candies spawned this morning.
    pub candies_spawned: u32,
    /// Candies eaten during the day.
    pub candies_eaten: u32,
    /// The evolve pass.
    pub evolve: EvolveReport,
    /// The model row sampled for this day.
    pub model: ModelRow,
}

/// One simulation instance.
#[derive(Debug, Clone)]
pub struct Evolution {
    config: SimulationConfig,
    population: Population,
    scheduler: StagedScheduler,
    clock: DayClock,
    ids: IdAllocator,
    stats: StatsCollector,
    rng: SmallRng,
}

impl Evolution {
    /// Build a simulation and seed its initial creatures.
    ///
    /// Genomes are drawn uniformly from `[0, max_*)` and positions uniformly
    /// over the plane. No candies exist until the first `step`.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Config`] if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = config
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let torus = Torus::new(config.width, config.height)?;
        let population = Population::new(torus, config.max_view_range.max(MIN_CELL_SIZE))?;

        let mut evolution = Self {
            scheduler: StagedScheduler::new(config.max_steps_per_day),
            clock: DayClock::new(config.max_days),
            stats: StatsCollector::new(config.collect_agent_rows),
            ids: IdAllocator::new(),
            population,
            config,
            rng,
        };

        for _ in 0..evolution.config.n_creatures {
            let genome = evolution.random_genome();
            evolution.spawn_creature(genome)?;
        }

        info!(
            creatures = evolution.config.n_creatures,
            candies_per_day = evolution.config.n_candies,
            max_days = evolution.config.max_days,
            seed = ?evolution.config.seed,
            "Simulation created"
        );
        Ok(evolution)
    }

    /// Simulate one full day.
    ///
    /// Returns `None` without touching any state once the simulation has
    /// finished.
    ///
    /// # Errors
    ///
    /// Returns an [`EvolutionError`] if the population and its index fall
    /// out of sync. The simulation should be discarded after an error.
    pub fn step(&mut self) -> Result<Option<DaySummary>, EvolutionError> {
        if !self.clock.is_running() {
            debug!(day = self.clock.day(), "Step ignored, simulation finished");
            return Ok(None);
        }
        let day = self.clock.current_day()?;
        let creatures_at_dawn = count(self.population.creature_count());

        // 1. Spawn today's candies.
        for _ in 0..self.config.n_candies {
            self.spawn_candy()?;
        }
        let candies_spawned = count(self.population.candy_count());

        // 2. Run the stages.
        let activity = self.scheduler.run_day(
            &mut self.population,
            self.config.max_energy,
            &self.config.behavior,
            &mut self.rng,
        )?;

        // 3. Sample before evolve changes the population.
        let model = self.stats.collect(day, &self.population);

        // 4. Judge and breed.
        let evolve = self.evolve()?;

        // 5. Candies never outlive their day.
        self.population.clear_candies()?;

        // 6. Advance.
        self.clock.advance()?;

        let summary = DaySummary {
            day,
            creatures_at_dawn,
            creatures_at_dusk: count(self.population.creature_count()),
            candies_spawned,
            candies_eaten: activity.candies_eaten,
            evolve,
            model,
        };
        info!(
            day,
            creatures = summary.creatures_at_dusk,
            starved = summary.evolve.starved,
            exhausted = summary.evolve.exhausted,
            births = summary.evolve.offspring.len(),
            candies_eaten = summary.candies_eaten,
            "Day completed"
        );
        if !self.clock.is_running() {
            info!(days = self.clock.day(), "Simulation finished");
        }
        Ok(Some(summary))
    }

    /// Judge every creature and breed today's parents.
    ///
    /// Creatures that ate nothing die; those that ate one candy gain penalty
    /// and die once it reaches the threshold; those that ate two are cleared
    /// of penalty and become parents. Offspring are placed at fresh random
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::World`] if a creature is missing from the
    /// index, or [`EvolutionError::Ids`] if ids run out.
    pub fn evolve(&mut self) -> Result<EvolveReport, EvolutionError> {
        let mut report = EvolveReport::default();
        let mut dead: Vec<(AgentId, DeathCause)> = Vec::new();
        let mut parents: Vec<Genome> = Vec::new();

        for (id, creature) in &mut self.population.creatures {
            match survival::judge(creature, &self.config.behavior) {
                Verdict::Dies(cause) => dead.push((*id, cause)),
                Verdict::Survives => report.survivors = report.survivors.saturating_add(1),
                Verdict::Reproduces => parents.push(creature.genome),
            }
        }

        for (id, cause) in dead {
            self.population.remove_creature(id)?;
            match cause {
                DeathCause::Starvation => report.starved = report.starved.saturating_add(1),
                DeathCause::Exhaustion => report.exhausted = report.exhausted.saturating_add(1),
            }
            debug!(creature = %id, %cause, "Creature died");
        }

        report.parents = count(parents.len());
        for genome in offspring_genomes(&parents, &mut self.rng) {
            let id = self.spawn_creature(genome)?;
            report.offspring.push(id);
        }
        debug!(
            parents = report.parents,
            offspring = report.offspring.len(),
            "Reproduction complete"
        );
        Ok(report)
    }

    /// Whether more days remain.
    pub const fn running(&self) -> bool {
        self.clock.is_running()
    }

    /// Days completed so far.
    pub const fn day(&self) -> u32 {
        self.clock.day()
    }

    /// The configuration this instance was built with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Live creatures and candies.
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// Mutable access to the live population.
    pub const fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    /// Rows sampled so far.
    pub const fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Take the collected rows, leaving an empty collector behind.
    pub fn take_stats(&mut self) -> StatsCollector {
        core::mem::replace(&mut self.stats, StatsCollector::new(self.config.collect_agent_rows))
    }

    fn random_position(&mut self) -> Position {
        let x = self.rng.random::<f64>() * self.config.width;
        let y = self.rng.random::<f64>() * self.config.height;
        Position::new(x, y)
    }

    fn random_genome(&mut self) -> Genome {
        Genome {
            speed: self.rng.random::<f64>() * self.config.max_speed,
            focus_angle: self.rng.random::<f64>() * self.config.max_focus_angle,
            view_range: self.rng.random::<f64>() * self.config.max_view_range,
            mut_rate: self.rng.random::<f64>() * self.config.mut_rate,
        }
    }

    fn spawn_creature(&mut self, genome: Genome) -> Result<AgentId, EvolutionError> {
        let id = self.ids.allocate()?;
        let position = self.random_position();
        let creature = Creature::newborn(
            id,
            position,
            genome,
            self.config.max_energy,
            &self.config.behavior,
            &mut self.rng,
        );
        self.population.add_creature(creature)?;
        Ok(id)
    }

    fn spawn_candy(&mut self) -> Result<AgentId, EvolutionError> {
        let id = self.ids.allocate()?;
        let position = self.random_position();
        self.population.add_candy(Candy::new(id, position))?;
        Ok(id)
    }
}

/// Saturating `usize` to `u32` conversion for counters.
pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn config(n_creatures: u32, n_candies: u32, max_days: u32) -> SimulationConfig {
        SimulationConfig {
            n_creatures,
            n_candies,
            max_days,
            seed: Some(7),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn construction_seeds_creatures_only() {
        let evolution = Evolution::new(config(5, 10, 3)).unwrap();
        assert_eq!(evolution.population().creature_count(), 5);
        assert_eq!(evolution.population().candy_count(), 0);
        assert!(evolution.running());
        assert_eq!(evolution.day(), 0);

        let max = SimulationConfig::default();
        for creature in evolution.population().creatures().values() {
            assert!((0.0..max.max_speed).contains(&creature.genome.speed));
            assert!((0.0..max.max_view_range).contains(&creature.genome.view_range));
            assert!((0.0..max.mut_rate).contains(&creature.genome.mut_rate));
            assert!(creature.penalty.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = SimulationConfig {
            height: -5.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Evolution::new(bad),
            Err(EvolutionError::Config { .. })
        ));
    }

    #[test]
    fn step_sweeps_candies_and_advances() {
        let mut evolution = Evolution::new(config(3, 6, 2)).unwrap();
        let summary = evolution.step().unwrap().unwrap();
        assert_eq!(summary.day, 1);
        assert_eq!(summary.candies_spawned, 6);
        assert_eq!(summary.model.n_candies, 6);
        assert_eq!(evolution.population().candy_count(), 0);
        assert_eq!(evolution.day(), 1);
        assert_eq!(
            summary.creatures_at_dusk,
            count(evolution.population().creature_count())
        );
    }

    #[test]
    fn evolve_keeps_parents_and_adds_two_children() {
        let mut evolution = Evolution::new(config(2, 0, 1)).unwrap();
        let ids: Vec<AgentId> = evolution.population().creatures().keys().copied().collect();
        for id in &ids {
            let creature = evolution.population_mut().creature_mut(*id).unwrap();
            creature.eaten_candies = 2;
            creature.penalty = 0.5;
        }

        let report = evolution.evolve().unwrap();
        assert_eq!(report.parents, 2);
        assert_eq!(report.offspring.len(), 2);
        assert_eq!(evolution.population().creature_count(), 4);
        for id in &ids {
            let parent = evolution.population().creatures().get(id).unwrap();
            assert!(parent.penalty.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn evolve_removes_starved_and_exhausted() {
        let mut evolution = Evolution::new(config(3, 0, 1)).unwrap();
        let ids: Vec<AgentId> = evolution.population().creatures().keys().copied().collect();
        let population = evolution.population_mut();
        population.creature_mut(ids[0]).unwrap().eaten_candies = 0;
        let tired = population.creature_mut(ids[1]).unwrap();
        tired.eaten_candies = 1;
        tired.penalty = 0.75;
        let fine = population.creature_mut(ids[2]).unwrap();
        fine.eaten_candies = 1;
        fine.penalty = 0.0;

        let report = evolution.evolve().unwrap();
        assert_eq!(report.starved, 1);
        assert_eq!(report.exhausted, 1);
        assert_eq!(report.survivors, 1);
        assert!(report.offspring.is_empty());
        assert_eq!(evolution.population().creature_count(), 1);
        assert_eq!(evolution.population().space().len(), 1);
    }

    #[test]
    fn same_seed_same_history() {
        let run = || {
            let mut evolution = Evolution::new(config(6, 12, 5)).unwrap();
            while evolution.running() {
                evolution.step().unwrap();
            }
            evolution.stats().model_rows().to_vec()
        };
        let (first, second) = (run(), run());
        assert_eq!(first.len(), 5);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.n_creatures, b.n_creatures);
            assert_eq!(a.count_eaten_2, b.count_eaten_2);
        }
    }
}
