//! Run loop for a single simulation.
//!
//! [`run_to_completion`] polls `running` and calls `step` until the day
//! limit is reached, handing each [`DaySummary`] to a [`DayCallback`].

use tracing::info;

use crate::evolution::{DaySummary, Evolution, EvolutionError};

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Days simulated by this call.
    pub days: u32,
    /// Live creatures when the run ended.
    pub final_creatures: u32,
    /// The last day summary, if any day ran.
    pub final_summary: Option<DaySummary>,
}

/// Callback invoked after each simulated day.
///
/// Implementations can use this to draw the population or stream
/// summaries. The simulation is borrowed read-only.
pub trait DayCallback {
    /// Called after a day completes successfully.
    fn on_day(&mut self, summary: &DaySummary, evolution: &Evolution);
}

/// A no-op day callback.
pub struct NoOpCallback;

impl DayCallback for NoOpCallback {
    fn on_day(&mut self, _summary: &DaySummary, _evolution: &Evolution) {}
}

/// Step `evolution` until it stops running.
///
/// Calling this on a finished simulation returns immediately with
/// `days == 0`.
///
/// # Errors
///
/// Returns the first [`EvolutionError`] raised by `step`.
pub fn run_to_completion(
    evolution: &mut Evolution,
    callback: &mut dyn DayCallback,
) -> Result<RunResult, EvolutionError> {
    let mut days: u32 = 0;
    let mut final_summary = None;

    while evolution.running() {
        let Some(summary) = evolution.step()? else {
            break;
        };
        callback.on_day(&summary, evolution);
        days = days.saturating_add(1);
        final_summary = Some(summary);
    }

    let final_creatures = crate::evolution::count(evolution.population().creature_count());
    info!(days, final_creatures, "Run complete");
    Ok(RunResult {
        days,
        final_creatures,
        final_summary,
    })
}
