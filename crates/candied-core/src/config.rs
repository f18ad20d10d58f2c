//! Configuration loading and typed config structures for the Candied
//! simulation.
//!
//! The canonical configuration lives in `candied-config.yaml` at the project
//! root. Its top-level keys mirror [`SimulationConfig`]; the batch driver
//! reads its own `batch` section from the same file and this loader ignores
//! it.

use core::f64::consts::PI;
use std::path::Path;

use candied_agents::{AgentError, BehaviorConfig};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The `behavior` section is out of range.
    #[error("invalid behavior config: {source}")]
    Behavior {
        /// The underlying validation error.
        #[from]
        source: AgentError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Upper bound on `max_steps_per_day`; the scheduler holds one stage per tick.
pub const MAX_STEPS_PER_DAY: u32 = 1_000_000;

/// Parameters of one simulation instance.
///
/// All fields have defaults matching the reference model: a 200x200 plane,
/// 5 creatures, 10 candies a day, 30 days of 100 steps each.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Plane height (default: 200).
    #[serde(default = "default_extent")]
    pub height: f64,

    /// Plane width (default: 200).
    #[serde(default = "default_extent")]
    pub width: f64,

    /// Creatures seeded at construction (default: 5).
    #[serde(default = "default_n_creatures")]
    pub n_creatures: u32,

    /// Candies spawned at the start of every day (default: 10).
    #[serde(default = "default_n_candies")]
    pub n_candies: u32,

    /// Days to simulate before `running` turns false (default: 30).
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Energy a creature without penalty starts each day with (default: 500).
    #[serde(default = "default_max_energy")]
    pub max_energy: f64,

    /// Upper bound of the initial mutation rate (default: 0.25).
    #[serde(default = "default_mut_rate")]
    pub mut_rate: f64,

    /// Upper bound of the initial speed (default: 10).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Upper bound of the initial view range (default: 5).
    ///
    /// Also sets the spatial index cell size.
    #[serde(default = "default_max_view_range")]
    pub max_view_range: f64,

    /// Upper bound of the initial focus angle in radians (default: PI).
    #[serde(default = "default_max_focus_angle")]
    pub max_focus_angle: f64,

    /// Compete stages per day (default: 100).
    #[serde(default = "default_max_steps_per_day")]
    pub max_steps_per_day: u32,

    /// Seed for the simulation's generator; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Whether to sample one agent row per live agent per day (default: true).
    #[serde(default = "default_collect_agent_rows")]
    pub collect_agent_rows: bool,

    /// Per-tick behavior constants.
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            height: default_extent(),
            width: default_extent(),
            n_creatures: default_n_creatures(),
            n_candies: default_n_candies(),
            max_days: default_max_days(),
            max_energy: default_max_energy(),
            mut_rate: default_mut_rate(),
            max_speed: default_max_speed(),
            max_view_range: default_max_view_range(),
            max_focus_angle: default_max_focus_angle(),
            max_steps_per_day: default_max_steps_per_day(),
            seed: None,
            collect_agent_rows: default_collect_agent_rows(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field, or
    /// [`ConfigError::Behavior`] if the `behavior` section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        let limits = [
            ("max_energy", self.max_energy),
            ("mut_rate", self.mut_rate),
            ("max_speed", self.max_speed),
            ("max_view_range", self.max_view_range),
            ("max_focus_angle", self.max_focus_angle),
        ];
        for (field, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be non-negative and finite, got {value}"),
                });
            }
        }

        if self.max_steps_per_day > MAX_STEPS_PER_DAY {
            return Err(ConfigError::Invalid {
                field: "max_steps_per_day",
                reason: format!(
                    "must be at most {MAX_STEPS_PER_DAY}, got {}",
                    self.max_steps_per_day
                ),
            });
        }

        self.behavior.validate()?;
        Ok(())
    }
}

const fn default_extent() -> f64 {
    200.0
}

const fn default_n_creatures() -> u32 {
    5
}

const fn default_n_candies() -> u32 {
    10
}

const fn default_max_days() -> u32 {
    30
}

const fn default_max_energy() -> f64 {
    500.0
}

const fn default_mut_rate() -> f64 {
    0.25
}

const fn default_max_speed() -> f64 {
    10.0
}

const fn default_max_view_range() -> f64 {
    5.0
}

const fn default_max_focus_angle() -> f64 {
    PI
}

const fn default_max_steps_per_day() -> u32 {
    100
}

const fn default_collect_agent_rows() -> bool {
    true
}
