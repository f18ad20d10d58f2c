//! Error types for the candied-agents crate.
//!
//! Degenerate genes are never errors: the behaviors absorb them with
//! fallbacks. Errors here mean a broken invariant between the agent
//! records and the spatial index, or an unusable configuration.

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The spatial index rejected an operation.
    #[error("spatial index error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: candied_world::WorldError,
    },

    /// A behavior constant is out of its valid range.
    #[error("invalid behavior parameter {field} = {value}: {reason}")]
    InvalidBehavior {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Explanation of the valid range.
        reason: &'static str,
    },
}
