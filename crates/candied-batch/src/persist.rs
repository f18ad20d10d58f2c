//! CSV output of averaged results.
//!
//! Layout:
//!
//! ```text
//! <output_dir>/Runs=10___N_creatures=20/raw data/Id=0000___N_candies=20.csv
//! <output_dir>/Runs=10___N_creatures=20/raw data/Id=0001___N_candies=50.csv
//! ```
//!
//! The directory level is only added when `base_params` is non-empty. File
//! ids continue from the number of result files already in the directory, so
//! repeated batches never overwrite each other. Values in names are rounded
//! to three decimals; NaN cells are written empty.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use candied_core::config::SimulationConfig;
use candied_types::{AgentRow, MODEL_COLUMNS};
use tracing::{debug, info, warn};

use crate::aggregate::{AveragedResult, AveragedRow};
use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::params::Parameter;
use crate::runner::{CompletedRun, RunOutcome};

/// Separator between the parts of a file or directory name.
const NAME_SEPARATOR: &str = "___";

/// Suffix of the agent-row file that accompanies a result file.
const AGENT_SUFFIX: &str = "___Agents.csv";

/// Header of the agent-row files.
const AGENT_COLUMNS: [&str; 16] = [
    "run",
    "iteration",
    "day",
    "agent_id",
    "agent_type",
    "done_steps",
    "energy_used_for_movement",
    "energy_spent_on_view_range",
    "energy_spent_on_focus_angle",
    "energy_lost",
    "energy_of_happiness",
    "moment_of_first_consumption",
    "moment_of_second_consumption",
    "eaten_candies",
    "age",
    "penalty",
];

/// Write every averaged result, plus agent rows when requested.
///
/// Returns the paths written. Combinations without any averaged row are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if a directory or file cannot be written.
pub fn save(
    results: &[AveragedResult],
    outcomes: &[RunOutcome],
    base: &SimulationConfig,
    batch: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    let dir = result_dir(base, batch)?;
    fs::create_dir_all(&dir).map_err(|source| BatchError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut file_id = existing_files(&dir)?;
    let mut written = Vec::new();
    for result in results {
        if result.rows.is_empty() {
            warn!(params = %result.params, "No runs to average, nothing written");
            continue;
        }
        let stem = file_stem(file_id, result);
        let path = dir.join(format!("{stem}.csv"));
        write_model_csv(&path, &result.rows)?;
        debug!(
            path = %path.display(),
            completed = result.completed,
            averaged = result.averaged,
            "Averaged result written"
        );
        written.push(path);

        if batch.write_agent_rows {
            let path = dir.join(format!("{stem}{AGENT_SUFFIX}"));
            write_agent_csv(&path, result.combination, outcomes)?;
            written.push(path);
        }
        file_id = file_id.saturating_add(1);
    }

    info!(dir = %dir.display(), files = written.len(), "Results saved");
    Ok(written)
}

/// Directory the results of this batch go into.
///
/// # Errors
///
/// Returns [`BatchError::UnknownParameter`] for a bad base parameter name.
pub fn result_dir(base: &SimulationConfig, batch: &BatchConfig) -> Result<PathBuf, BatchError> {
    if batch.base_params.is_empty() {
        return Ok(batch.output_dir.clone());
    }

    let mut name = format!("Runs={}", batch.iterations);
    for key in &batch.base_params {
        let parameter = Parameter::parse(key)?;
        let value = if let Some(values) = batch.variable_params.get(key) {
            let rounded: Vec<String> = values.iter().map(|v| format_value(*v)).collect();
            format!("({})", rounded.join(", "))
        } else if let Some(value) = batch.fixed_params.get(key) {
            format_value(*value)
        } else {
            format_value(parameter.get(base))
        };
        name.push_str(&format!(
            "{NAME_SEPARATOR}{}={value}",
            capitalize(parameter.name())
        ));
    }
    Ok(batch.output_dir.join(name).join("raw data"))
}

/// `Id=0007___N_candies=20` for file id 7.
pub fn file_stem(file_id: usize, result: &AveragedResult) -> String {
    let mut stem = format!("Id={file_id:04}");
    for (parameter, value) in &result.params.values {
        stem.push_str(&format!(
            "{NAME_SEPARATOR}{}={}",
            capitalize(parameter.name()),
            format_value(*value)
        ));
    }
    stem
}

/// Round to three decimals and print without trailing zeros.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid printing "-0".
    let rounded = if rounded.abs() < f64::EPSILON { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Upper-case the first letter and lower-case the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Number of averaged result files already in `dir`; agent-row files are
/// not counted.
fn existing_files(dir: &Path) -> Result<usize, BatchError> {
    let io_err = |source| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut count: usize = 0;
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_result = path.is_file()
            && path.file_name().and_then(|name| name.to_str()).is_some_and(|name| {
                name.starts_with("Id=")
                    && name.ends_with(".csv")
                    && !name.ends_with(AGENT_SUFFIX)
            });
        if is_result {
            count = count.saturating_add(1);
        }
    }
    Ok(count)
}

fn create(path: &Path) -> Result<BufWriter<File>, BatchError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Write averaged model rows with a [`MODEL_COLUMNS`] header.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if the file cannot be written.
pub fn write_model_csv(path: &Path, rows: &[AveragedRow]) -> Result<(), BatchError> {
    let io_err = |source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = create(path)?;
    writeln!(writer, "{}", MODEL_COLUMNS.join(",")).map_err(io_err)?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| float_cell(Some(*v))).collect();
        writeln!(writer, "{}", cells.join(",")).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Write the agent rows of every completed run of `combination`.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if the file cannot be written.
pub fn write_agent_csv(
    path: &Path,
    combination: usize,
    outcomes: &[RunOutcome],
) -> Result<(), BatchError> {
    let io_err = |source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = create(path)?;
    writeln!(writer, "{}", AGENT_COLUMNS.join(",")).map_err(io_err)?;
    for outcome in outcomes {
        let RunOutcome::Completed(run) = outcome else {
            continue;
        };
        if run.combination != combination {
            continue;
        }
        for row in &run.agent_rows {
            writeln!(writer, "{}", agent_line(run, row)).map_err(io_err)?;
        }
    }
    writer.flush().map_err(io_err)
}

fn agent_line(run: &CompletedRun, row: &AgentRow) -> String {
    [
        run.run.to_string(),
        run.iteration.to_string(),
        row.day.to_string(),
        row.agent_id.to_string(),
        row.agent_type.to_string(),
        int_cell(row.done_steps),
        float_cell(row.energy_used_for_movement),
        float_cell(row.energy_spent_on_view_range),
        float_cell(row.energy_spent_on_focus_angle),
        float_cell(row.energy_lost),
        float_cell(row.energy_of_happiness),
        int_cell(row.moment_of_first_consumption),
        int_cell(row.moment_of_second_consumption),
        int_cell(row.eaten_candies),
        int_cell(row.age),
        float_cell(row.penalty),
    ]
    .join(",")
}

fn float_cell(value: Option<f64>) -> String {
    value
        .filter(|v| !v.is_nan())
        .map_or_else(String::new, |v| v.to_string())
}

fn int_cell<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeMap;

    use candied_types::{AgentId, RunId};

    use super::*;
    use crate::grid::ParamSet;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("candied-persist-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn result(n_candies: f64) -> AveragedResult {
        AveragedResult {
            combination: 0,
            params: ParamSet {
                values: vec![(Parameter::NCandies, n_candies)],
            },
            completed: 1,
            averaged: 1,
            rows: vec![[1.0, 2.0, 10.0, f64::NAN, 1.5, 1.0, 1.0, 0.1, 1.0, 0.0, 1.0]],
        }
    }

    #[test]
    fn values_round_to_three_decimals() {
        assert_eq!(format_value(20.0), "20");
        assert_eq!(format_value(0.123_456), "0.123");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-0.000_1), "0");
    }

    #[test]
    fn names_embed_parameters() {
        assert_eq!(capitalize("n_candies"), "N_candies");
        assert_eq!(file_stem(7, &result(20.0)), "Id=0007___N_candies=20");

        let batch = BatchConfig {
            iterations: 10,
            output_dir: PathBuf::from("out"),
            base_params: vec!["n_creatures".to_owned(), "n_candies".to_owned()],
            fixed_params: BTreeMap::from([("n_creatures".to_owned(), 20.0)]),
            variable_params: BTreeMap::from([("n_candies".to_owned(), vec![20.0, 50.5])]),
            ..BatchConfig::default()
        };
        let dir = result_dir(&SimulationConfig::default(), &batch).unwrap();
        assert_eq!(
            dir,
            PathBuf::from("out/Runs=10___N_creatures=20___N_candies=(20, 50.5)/raw data")
        );
    }

    #[test]
    fn base_param_falls_back_to_simulation_value() {
        let batch = BatchConfig {
            iterations: 2,
            output_dir: PathBuf::from("out"),
            base_params: vec!["max_days".to_owned()],
            ..BatchConfig::default()
        };
        let dir = result_dir(&SimulationConfig::default(), &batch).unwrap();
        assert_eq!(dir, PathBuf::from("out/Runs=2___Max_days=30/raw data"));
    }

    #[test]
    fn save_writes_numbered_files() {
        let dir = scratch_dir("save");
        let batch = BatchConfig {
            output_dir: dir.clone(),
            ..BatchConfig::default()
        };
        let results = vec![result(5.0), result(10.0)];
        let written = save(&results, &[], &SimulationConfig::default(), &batch).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.join("Id=0000___N_candies=5.csv").is_file());
        assert!(dir.join("Id=0001___N_candies=10.csv").is_file());

        let contents = fs::read_to_string(&written[0]).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), MODEL_COLUMNS.join(","));
        assert_eq!(lines.next().unwrap(), "1,2,10,,1.5,1,1,0.1,1,0,1");

        // A second batch continues the numbering.
        let again = save(&results[..1], &[], &SimulationConfig::default(), &batch).unwrap();
        assert_eq!(
            again.first().unwrap().file_name().unwrap(),
            "Id=0002___N_candies=5.csv"
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn agent_files_do_not_advance_numbering() {
        let dir = scratch_dir("numbering");
        let batch = BatchConfig {
            output_dir: dir.clone(),
            write_agent_rows: true,
            ..BatchConfig::default()
        };
        let results = vec![result(5.0)];
        let first = save(&results, &[], &SimulationConfig::default(), &batch).unwrap();
        assert_eq!(first.len(), 2);
        assert!(dir.join("Id=0000___N_candies=5___Agents.csv").is_file());
        fs::write(dir.join("notes.txt"), "unrelated").unwrap();

        let second = save(&results, &[], &SimulationConfig::default(), &batch).unwrap();
        assert_eq!(
            second.first().unwrap().file_name().unwrap(),
            "Id=0001___N_candies=5.csv"
        );
        assert!(dir.join("Id=0001___N_candies=5___Agents.csv").is_file());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn agent_rows_are_written_per_combination() {
        let dir = scratch_dir("agents");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("agents.csv");
        let outcomes = vec![RunOutcome::Completed(CompletedRun {
            run: RunId::from_raw(0),
            combination: 0,
            iteration: 3,
            model_rows: Vec::new(),
            agent_rows: vec![AgentRow::candy(1, AgentId::from_raw(42))],
        })];
        write_agent_csv(&path, 0, &outcomes).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let line = contents.lines().nth(1).unwrap();
        assert_eq!(line, "0,3,1,42,Candy,,,,,,,,,,,");
        let _ = fs::remove_dir_all(&dir);
    }
}
