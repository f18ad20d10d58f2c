//! Error types for the `candied-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use candied_types::AgentId;

/// Errors that can occur during geometry or spatial-index operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The plane extents are not positive finite numbers.
    #[error("invalid plane dimensions {width} x {height}: both must be positive and finite")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// The grid cell size is not a positive finite number.
    #[error("invalid grid cell size {0}: must be positive and finite")]
    InvalidCellSize(f64),

    /// The agent is not present in the index.
    #[error("agent not found in spatial index: {0}")]
    AgentNotFound(AgentId),

    /// The agent is already present in the index.
    #[error("agent already placed in spatial index: {0}")]
    DuplicateAgent(AgentId),
}
