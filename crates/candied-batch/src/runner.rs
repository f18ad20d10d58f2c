//! Parallel execution of a batch.
//!
//! Each (combination, iteration) pair becomes one [`RunJob`] with its own
//! config and seed. Jobs share nothing, so they run on a rayon pool and
//! their rows are collected afterwards. A job that fails is logged and
//! reported as [`RunOutcome::Failed`]; the rest of the grid carries on.

use candied_core::config::SimulationConfig;
use candied_core::evolution::{Evolution, EvolutionError};
use candied_core::runner::{NoOpCallback, run_to_completion};
use candied_types::{AgentRow, ModelRow, RunId};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::grid::ParamSet;

/// One simulation to run.
#[derive(Debug, Clone)]
pub struct RunJob {
    /// Position of the job in the batch.
    pub run: RunId,
    /// Index of the parameter combination in the grid.
    pub combination: usize,
    /// Iteration within the combination.
    pub iteration: u32,
    /// Fully resolved simulation config, seed included.
    pub config: SimulationConfig,
}

/// Rows of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    /// Position of the job in the batch.
    pub run: RunId,
    /// Index of the parameter combination in the grid.
    pub combination: usize,
    /// Iteration within the combination.
    pub iteration: u32,
    /// One row per simulated day.
    pub model_rows: Vec<ModelRow>,
    /// One row per live agent per day, if collected.
    pub agent_rows: Vec<AgentRow>,
}

impl CompletedRun {
    /// Whether no creature was left at the end of the run.
    pub fn died_out(&self) -> bool {
        self.model_rows
            .last()
            .is_some_and(ModelRow::is_dead_population)
    }
}

/// What became of one job.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The run reached `max_days`.
    Completed(CompletedRun),
    /// The run raised an error and was abandoned.
    Failed {
        /// Position of the job in the batch.
        run: RunId,
        /// Index of the parameter combination in the grid.
        combination: usize,
        /// Iteration within the combination.
        iteration: u32,
        /// The error, rendered.
        error: String,
    },
}

/// Build every job of the batch.
///
/// Jobs are numbered in order and each is seeded with `base_seed + run`
/// (wrapping), so a batch with a fixed seed is reproducible regardless of
/// scheduling.
///
/// # Errors
///
/// Returns [`BatchError::InvalidParameter`] if a value does not fit its
/// option, or [`BatchError::Config`] if a resolved config is invalid.
pub fn plan(
    base: &SimulationConfig,
    batch: &BatchConfig,
    grid: &[ParamSet],
    base_seed: u64,
) -> Result<Vec<RunJob>, BatchError> {
    let mut pinned = base.clone();
    for (parameter, value) in batch.fixed()? {
        parameter.apply(&mut pinned, value)?;
    }

    let mut jobs = Vec::new();
    let mut next_run: u64 = 0;
    for (combination, set) in grid.iter().enumerate() {
        let mut config = pinned.clone();
        set.apply(&mut config)?;
        config.validate()?;
        for iteration in 0..batch.iterations {
            jobs.push(RunJob {
                run: RunId::from_raw(next_run),
                combination,
                iteration,
                config: SimulationConfig {
                    seed: Some(base_seed.wrapping_add(next_run)),
                    ..config.clone()
                },
            });
            next_run = next_run.wrapping_add(1);
        }
    }
    Ok(jobs)
}

/// Run every job, in parallel when `threads` allows.
///
/// Outcomes come back in job order.
///
/// # Errors
///
/// Returns [`BatchError::ThreadPool`] if the worker pool cannot be built.
pub fn run_all(jobs: Vec<RunJob>, threads: Option<usize>) -> Result<Vec<RunOutcome>, BatchError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    info!(jobs = jobs.len(), threads = pool.current_num_threads(), "Batch starting");

    let outcomes: Vec<RunOutcome> = pool.install(|| jobs.into_par_iter().map(run_one).collect());

    let mut failed: usize = 0;
    for outcome in &outcomes {
        if let RunOutcome::Failed {
            run,
            combination,
            iteration,
            error,
        } = outcome
        {
            warn!(
                run = %run,
                combination,
                iteration,
                error = %error,
                "Run failed, excluded from results"
            );
            failed = failed.saturating_add(1);
        }
    }
    info!(runs = outcomes.len(), failed, "Batch finished");
    Ok(outcomes)
}

/// Run one job to completion, turning an error into a failed outcome.
///
/// Failures are logged by [`run_all`] once every job has finished.
pub fn run_one(job: RunJob) -> RunOutcome {
    let RunJob {
        run,
        combination,
        iteration,
        config,
    } = job;
    match simulate(config) {
        Ok((model_rows, agent_rows)) => {
            debug!(run = %run, days = model_rows.len(), "Run completed");
            RunOutcome::Completed(CompletedRun {
                run,
                combination,
                iteration,
                model_rows,
                agent_rows,
            })
        }
        Err(error) => {
            debug!(run = %run, error = %error, "Run failed");
            RunOutcome::Failed {
                run,
                combination,
                iteration,
                error: error.to_string(),
            }
        }
    }
}

fn simulate(config: SimulationConfig) -> Result<(Vec<ModelRow>, Vec<AgentRow>), EvolutionError> {
    let mut evolution = Evolution::new(config)?;
    run_to_completion(&mut evolution, &mut NoOpCallback)?;
    Ok(evolution.take_stats().into_rows())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::grid;
    use crate::params::Parameter;

    fn small_base() -> SimulationConfig {
        SimulationConfig {
            width: 40.0,
            height: 40.0,
            n_creatures: 4,
            max_days: 3,
            max_steps_per_day: 20,
            collect_agent_rows: false,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn plan_covers_grid_times_iterations() {
        let batch = BatchConfig {
            iterations: 3,
            ..BatchConfig::default()
        };
        let grid = grid::expand(&[(Parameter::NCandies, vec![5.0, 10.0])]);
        let jobs = plan(&small_base(), &batch, &grid, 100).unwrap();

        assert_eq!(jobs.len(), 6);
        let seeds: Vec<Option<u64>> = jobs.iter().map(|job| job.config.seed).collect();
        assert_eq!(seeds, (100..106).map(Some).collect::<Vec<_>>());
        assert_eq!(jobs.last().unwrap().config.n_candies, 10);
        assert_eq!(jobs.last().unwrap().iteration, 2);
        assert_eq!(jobs.last().unwrap().combination, 1);
        assert_eq!(jobs.last().unwrap().run, RunId::from_raw(5));
    }

    #[test]
    fn plan_applies_fixed_params() {
        let batch = BatchConfig {
            iterations: 1,
            fixed_params: [("n_creatures".to_owned(), 9.0)].into_iter().collect(),
            ..BatchConfig::default()
        };
        let jobs = plan(&small_base(), &batch, &grid::expand(&[]), 0).unwrap();
        assert_eq!(jobs.first().unwrap().config.n_creatures, 9);
    }

    #[test]
    fn plan_rejects_invalid_combination() {
        let grid = grid::expand(&[(Parameter::Width, vec![10.0, -1.0])]);
        let result = plan(&small_base(), &BatchConfig::default(), &grid, 0);
        assert!(matches!(result, Err(BatchError::Config { .. })));
    }

    #[test]
    fn runs_complete_in_job_order() {
        let batch = BatchConfig {
            iterations: 2,
            ..BatchConfig::default()
        };
        let grid = grid::expand(&[(Parameter::NCandies, vec![0.0, 30.0])]);
        let jobs = plan(&small_base(), &batch, &grid, 7).unwrap();
        let outcomes = run_all(jobs, Some(2)).unwrap();

        assert_eq!(outcomes.len(), 4);
        for (index, outcome) in outcomes.iter().enumerate() {
            let RunOutcome::Completed(run) = outcome else {
                panic!("run {index} failed");
            };
            assert_eq!(run.combination, index / 2);
            assert_eq!(run.run.into_inner(), u64::try_from(index).unwrap());
            assert_eq!(run.model_rows.len(), 3);
            assert!(run.agent_rows.is_empty());
        }
        // Without food every population starves on day one.
        let RunOutcome::Completed(starved) = outcomes.first().unwrap() else {
            panic!("run failed");
        };
        assert!(starved.died_out());
    }
}
