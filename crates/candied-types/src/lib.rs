//! Shared type definitions for the Candied evolution simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the spatial index, the agent behaviors, the lifecycle engine, and
//! the batch driver. Nothing here owns simulation state or draws random
//! numbers.
//!
//! # Modules
//!
//! - [`ids`] -- Monotonic integer identifiers for agents and batch runs
//! - [`enums`] -- Agent kinds and rendering enumerations
//! - [`structs`] -- Positions, genomes, and rendering portrayals
//! - [`rows`] -- Model-level and agent-level tabular rows

pub mod enums;
pub mod ids;
pub mod rows;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentKind, Color, Shape};
pub use ids::{AgentId, RunId};
pub use rows::{AgentRow, MODEL_COLUMNS, ModelRow};
pub use structs::{Genome, Portrayal, Position};
