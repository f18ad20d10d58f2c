//! The `batch` section of `candied-config.yaml`.
//!
//! ```yaml
//! batch:
//!   iterations: 10
//!   fixed_params:
//!     n_creatures: 20
//!   variable_params:
//!     n_candies: [20, 50, 100]
//!   base_params: [n_creatures]
//!   output_dir: results
//! ```
//!
//! Every run starts from the top-level simulation config, applies
//! `fixed_params`, then one combination of `variable_params`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BatchError;
use crate::params::Parameter;

/// How a batch sweeps the simulation options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchConfig {
    /// Runs per parameter combination (default: 10).
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Options pinned for every run.
    #[serde(default)]
    pub fixed_params: BTreeMap<String, f64>,

    /// Options swept over; every combination is run.
    ///
    /// Combinations are ordered by parameter name.
    #[serde(default)]
    pub variable_params: BTreeMap<String, Vec<f64>>,

    /// Options whose values name the result directory.
    ///
    /// Empty means results go straight into `output_dir`.
    #[serde(default)]
    pub base_params: Vec<String>,

    /// Root directory for result files (default: `results`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Leave runs whose population died out out of the averages
    /// (default: true).
    #[serde(default = "default_ignore_dead_populations")]
    pub ignore_dead_populations: bool,

    /// Also write every agent row of every run (default: false).
    #[serde(default)]
    pub write_agent_rows: bool,

    /// Seed from which per-run seeds are derived.
    ///
    /// Falls back to the simulation seed, then to a random one.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Worker threads; `None` uses one per core.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            fixed_params: BTreeMap::new(),
            variable_params: BTreeMap::new(),
            base_params: Vec::new(),
            output_dir: default_output_dir(),
            ignore_dead_populations: default_ignore_dead_populations(),
            write_agent_rows: false,
            seed: None,
            threads: None,
        }
    }
}

/// Wrapper matching the layout of the config file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    batch: BatchConfig,
}

impl BatchConfig {
    /// Load the `batch` section from the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Io`] if the file cannot be read, or
    /// [`BatchError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, BatchError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse the `batch` section out of a whole config file.
    ///
    /// A file without a `batch` key yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Yaml`] if the YAML is malformed.
    pub fn parse(yaml: &str) -> Result<Self, BatchError> {
        let file: ConfigFile = serde_yml::from_str(yaml)?;
        Ok(file.batch)
    }

    /// Check every parameter name resolves and the sweep is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownParameter`] for a bad name, or
    /// [`BatchError::InvalidBatch`] for an empty sweep.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.iterations == 0 {
            return Err(BatchError::InvalidBatch {
                reason: "iterations must be at least 1".to_owned(),
            });
        }
        if self.threads == Some(0) {
            return Err(BatchError::InvalidBatch {
                reason: "threads must be at least 1".to_owned(),
            });
        }
        for (name, values) in &self.variable_params {
            Parameter::parse(name)?;
            if values.is_empty() {
                return Err(BatchError::InvalidBatch {
                    reason: format!("variable parameter {name} has no values"),
                });
            }
            if self.fixed_params.contains_key(name) {
                return Err(BatchError::InvalidBatch {
                    reason: format!("{name} is both fixed and variable"),
                });
            }
        }
        for name in self.fixed_params.keys().chain(&self.base_params) {
            Parameter::parse(name)?;
        }
        Ok(())
    }

    /// The fixed parameters, resolved.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownParameter`] for a bad name.
    pub fn fixed(&self) -> Result<Vec<(Parameter, f64)>, BatchError> {
        self.fixed_params
            .iter()
            .map(|(name, value)| Ok((Parameter::parse(name)?, *value)))
            .collect()
    }

    /// The variable parameters, resolved, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownParameter`] for a bad name.
    pub fn variable(&self) -> Result<Vec<(Parameter, Vec<f64>)>, BatchError> {
        self.variable_params
            .iter()
            .map(|(name, values)| Ok((Parameter::parse(name)?, values.clone())))
            .collect()
    }
}

const fn default_iterations() -> u32 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

const fn default_ignore_dead_populations() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_gives_defaults() {
        let config = BatchConfig::parse("width: 10\n").unwrap();
        assert_eq!(config, BatchConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = BatchConfig::parse(include_str!("../../../candied-config.yaml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.variable().unwrap().len(), 1);
        assert!(config.base_params.contains(&"n_creatures".to_owned()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = BatchConfig::from_file(Path::new("/nonexistent/candied-config.yaml"));
        assert!(matches!(result, Err(BatchError::Io { .. })));
    }

    #[test]
    fn parses_sweep() {
        let yaml = "
n_creatures: 5
batch:
  iterations: 3
  fixed_params:
    n_creatures: 20
  variable_params:
    n_candies: [20, 50]
    max_speed: [1.5]
  base_params: [n_creatures]
  seed: 9
";
        let config = BatchConfig::parse(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.seed, Some(9));
        let variable = config.variable().unwrap();
        assert_eq!(variable.len(), 2);
        // Name order: max_speed before n_candies.
        assert_eq!(variable.first().unwrap().0, Parameter::MaxSpeed);
        assert_eq!(config.fixed().unwrap(), vec![(Parameter::NCreatures, 20.0)]);
    }

    #[test]
    fn rejects_unknown_names_and_empty_sweeps() {
        let unknown = BatchConfig {
            variable_params: BTreeMap::from([("speed".to_owned(), vec![1.0])]),
            ..BatchConfig::default()
        };
        assert!(matches!(
            unknown.validate(),
            Err(BatchError::UnknownParameter { .. })
        ));

        let empty = BatchConfig {
            variable_params: BTreeMap::from([("n_candies".to_owned(), Vec::new())]),
            ..BatchConfig::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(BatchError::InvalidBatch { .. })
        ));

        let none = BatchConfig {
            iterations: 0,
            ..BatchConfig::default()
        };
        assert!(none.validate().is_err());
    }
}
