//! Error types for the batch driver.
//!
//! [`BatchError`] covers everything that can stop a batch before or after
//! the runs. A single run failing is not a [`BatchError`]: it is recorded
//! as a failed outcome and left out of the averages.

use std::path::PathBuf;

/// Top-level error for the batch driver.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The simulation section of the config was rejected.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: candied_core::config::ConfigError,
    },

    /// The `batch` section could not be parsed.
    #[error("failed to parse batch YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A parameter name does not match any simulation option.
    #[error("unknown parameter: {name}")]
    UnknownParameter {
        /// The name as written in the config.
        name: String,
    },

    /// A parameter value cannot be applied to its option.
    #[error("invalid value {value} for {name}: {reason}")]
    InvalidParameter {
        /// The option being set.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The `batch` section is inconsistent.
    #[error("invalid batch config: {reason}")]
    InvalidBatch {
        /// What is wrong with it.
        reason: String,
    },

    /// The worker pool could not be built.
    #[error("thread pool error: {source}")]
    ThreadPool {
        /// The underlying rayon error.
        #[from]
        source: rayon::ThreadPoolBuildError,
    },

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl From<serde_yml::Error> for BatchError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
