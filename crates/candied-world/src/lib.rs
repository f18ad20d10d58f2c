//! Geometry and spatial queries for the Candied evolution simulation.
//!
//! The world is a rectangular plane whose opposite edges are identified, so
//! every distance and direction takes the shorter way around. Agents are
//! bucketed in a uniform grid so that "who is within `r` of here" touches
//! only the cells overlapping the query disc.
//!
//! # Modules
//!
//! - [`error`] -- Error types for geometry and index operations.
//! - [`torus`] -- [`Torus`]: wrapping, shortest deltas, distances, headings.
//! - [`spatial`] -- [`SpatialIndex`]: uniform-grid buckets over agent positions.

pub mod error;
pub mod spatial;
pub mod torus;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use spatial::{Neighbor, SpatialIndex};
pub use torus::Torus;
