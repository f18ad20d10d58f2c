//! Creature and candy behaviors for the Candied evolution simulation.
//!
//! This crate contains the logic layer for agents: everything that acts on
//! a single creature or candy without owning the population. It sits between
//! `candied-world` (geometry and spatial queries) and `candied-core` (the
//! staged day loop and population lifecycle).
//!
//! # Modules
//!
//! - [`candy`] -- [`Candy`] records and the [`Pantry`] seam used for eating.
//! - [`config`] -- Tunable behavior constants ([`BehaviorConfig`]).
//! - [`creature`] -- [`Creature`] state and its per-stage handlers.
//! - [`energy`] -- Per-tick energy cost model ([`TickCost`]).
//! - [`error`] -- Error types for agent operations ([`AgentError`]).
//! - [`reproduction`] -- Crossover, mutation, and parent pairing.
//! - [`survival`] -- End-of-day survival verdicts ([`Verdict`]).

pub mod candy;
pub mod config;
pub mod creature;
pub mod energy;
pub mod error;
pub mod reproduction;
pub mod survival;

// Re-export primary types at crate root for convenience.
pub use candy::{Candy, Pantry};
pub use config::BehaviorConfig;
pub use creature::{Creature, DayTelemetry, TickOutcome};
pub use energy::{MIN_FOCUS_ANGLE, TickCost, effective_focus, tick_cost};
pub use error::AgentError;
pub use reproduction::{crossover, mutate, offspring_genomes, pair_parents, standard_normal};
pub use survival::{DeathCause, Verdict, judge};
