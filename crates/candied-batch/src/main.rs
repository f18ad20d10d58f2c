//! Batch driver for the Candied evolution simulation.
//!
//! Sweeps a grid of simulation parameters, runs every combination several
//! times in parallel, averages the per-day model rows of each combination,
//! and writes one CSV file per combination.
//!
//! # Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load `candied-config.yaml` (or the path given as first argument)
//! 3. Expand the variable parameters into a grid
//! 4. Plan one job per (combination, iteration) with derived seeds
//! 5. Run every job on a rayon pool; failed runs are logged and skipped
//! 6. Average each combination and save the CSV files

mod aggregate;
mod config;
mod error;
mod grid;
mod params;
mod persist;
mod runner;

use std::path::{Path, PathBuf};

use candied_core::config::SimulationConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::BatchConfig;
use crate::error::BatchError;

/// Config file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "candied-config.yaml";

/// Application entry point for the batch driver.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or results cannot be
/// written. Individual runs failing is not an error.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("candied-batch starting");

    // 2. Load configuration.
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (base, batch) = load_config(&path)?;
    info!(
        path = %path.display(),
        iterations = batch.iterations,
        variable = batch.variable_params.len(),
        max_days = base.max_days,
        "Configuration loaded"
    );

    // 3. Expand the grid.
    let grid = grid::expand(&batch.variable()?);
    info!(combinations = grid.len(), "Parameter grid expanded");

    // 4. Plan the runs.
    let base_seed = batch
        .seed
        .or(base.seed)
        .unwrap_or_else(rand::random::<u64>);
    let jobs = runner::plan(&base, &batch, &grid, base_seed)?;
    info!(runs = jobs.len(), base_seed, "Runs planned");

    // 5. Run.
    let outcomes = runner::run_all(jobs, batch.threads)?;

    // 6. Average and save.
    let results = aggregate::average(&grid, &outcomes, batch.ignore_dead_populations);
    let written = persist::save(&results, &outcomes, &base, &batch)?;

    info!(files = written.len(), "candied-batch complete");
    Ok(())
}

/// Load the simulation config and its `batch` section from one file.
fn load_config(path: &Path) -> Result<(SimulationConfig, BatchConfig), BatchError> {
    let base = SimulationConfig::from_file(path)?;
    base.validate()?;
    let batch = BatchConfig::from_file(path)?;
    batch.validate()?;
    Ok((base, batch))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn loads_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../candied-config.yaml");
        let (base, batch) = load_config(&path).unwrap();
        assert_eq!(base, SimulationConfig::default());
        assert_eq!(batch.iterations, 10);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_config(Path::new("/nonexistent/candied-config.yaml"));
        assert!(matches!(result, Err(BatchError::Config { .. })));
    }
}
