//! Day clock, staged scheduler, and population lifecycle for the Candied
//! evolution simulation.
//!
//! This crate owns the day loop that drives the simulation: spawn candies,
//! run the staged scheduler (prepare, compete x N, report), sample
//! statistics, judge and breed the creatures, then sweep the candies away.
//!
//! # Modules
//!
//! - [`clock`] -- Day counter and the `running` flag.
//! - [`config`] -- Configuration loading from `candied-config.yaml` into
//!   strongly-typed structs.
//! - [`evolution`] -- The [`Evolution`] lifecycle manager and its `step()`.
//! - [`ids`] -- Monotonic [`IdAllocator`] for agent identifiers.
//! - [`population`] -- Live creatures, candies, and their spatial index.
//! - [`portrayal`] -- Rendering contract for live agents.
//! - [`runner`] -- [`run_to_completion`] and the [`DayCallback`] hook.
//! - [`schedule`] -- Staged, per-stage shuffled activation of live agents.
//! - [`stats`] -- Per-day model and agent rows.
//!
//! [`Evolution`]: evolution::Evolution
//! [`IdAllocator`]: ids::IdAllocator
//! [`run_to_completion`]: runner::run_to_completion
//! [`DayCallback`]: runner::DayCallback

pub mod clock;
pub mod config;
pub mod evolution;
pub mod ids;
pub mod population;
pub mod portrayal;
pub mod runner;
pub mod schedule;
pub mod stats;
