//! Averaging runs that share a parameter combination.
//!
//! Runs are grouped by combination. Populations that died out can be
//! dropped first. The remaining runs are averaged day by day and column by
//! column; NaN cells (means over an empty population) are skipped, and a
//! cell with no finite value across runs stays NaN.

use candied_types::MODEL_COLUMNS;
use tracing::debug;

use crate::grid::ParamSet;
use crate::runner::{CompletedRun, RunOutcome};

/// One averaged row; columns follow [`MODEL_COLUMNS`].
pub type AveragedRow = [f64; MODEL_COLUMNS.len()];

/// The averaged result of one parameter combination.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedResult {
    /// Index of the combination in the grid.
    pub combination: usize,
    /// The combination's parameter values.
    pub params: ParamSet,
    /// Runs that completed.
    pub completed: u32,
    /// Runs that went into the average.
    pub averaged: u32,
    /// Averaged rows, one per day.
    pub rows: Vec<AveragedRow>,
}

/// Average the completed runs of every combination in `grid`.
///
/// Failed runs are ignored. Results come back in grid order, one per
/// combination, even when no run survived the filter.
pub fn average(
    grid: &[ParamSet],
    outcomes: &[RunOutcome],
    ignore_dead_populations: bool,
) -> Vec<AveragedResult> {
    grid.iter()
        .enumerate()
        .map(|(combination, params)| {
            let completed: Vec<&CompletedRun> = outcomes
                .iter()
                .filter_map(|outcome| match outcome {
                    RunOutcome::Completed(run) if run.combination == combination => Some(run),
                    _ => None,
                })
                .collect();
            let kept: Vec<&CompletedRun> = completed
                .iter()
                .copied()
                .filter(|run| !(ignore_dead_populations && run.died_out()))
                .collect();
            debug!(
                combination,
                completed = completed.len(),
                kept = kept.len(),
                "Averaging runs"
            );
            AveragedResult {
                combination,
                params: params.clone(),
                completed: count(completed.len()),
                averaged: count(kept.len()),
                rows: average_rows(&kept),
            }
        })
        .collect()
}

/// Day-by-day column means over `runs`, skipping NaN cells.
///
/// Runs of different length are averaged over the runs that reached each
/// day.
pub fn average_rows(runs: &[&CompletedRun]) -> Vec<AveragedRow> {
    let days = runs.iter().map(|run| run.model_rows.len()).max().unwrap_or(0);
    (0..days)
        .map(|day| {
            let mut sums = [0.0; MODEL_COLUMNS.len()];
            let mut counts = [0_u32; MODEL_COLUMNS.len()];
            for row in runs.iter().filter_map(|run| run.model_rows.get(day)) {
                for ((sum, n), value) in sums.iter_mut().zip(counts.iter_mut()).zip(row.values()) {
                    if value.is_finite() {
                        *sum += value;
                        *n = n.saturating_add(1);
                    }
                }
            }
            let mut means = [f64::NAN; MODEL_COLUMNS.len()];
            for ((mean, sum), n) in means.iter_mut().zip(sums).zip(counts) {
                if n > 0 {
                    *mean = sum / f64::from(n);
                }
            }
            means
        })
        .collect()
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
