//! End-of-day survival verdicts.
//!
//! Once the day's stages have run, every creature is judged on how many
//! candies it ate:
//!
//! - none: it dies of starvation;
//! - one: it survives with `penalty_step` more penalty, and dies of
//!   exhaustion once the penalty reaches `penalty_death_threshold`;
//! - two: its penalty is cleared and it becomes a parent.

use crate::config::BehaviorConfig;
use crate::creature::{Creature, MAX_EATEN_CANDIES};

/// Why a creature was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The creature ate nothing today.
    Starvation,
    /// The creature's accumulated penalty reached the threshold.
    Exhaustion,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Exhaustion => write!(f, "exhaustion"),
        }
    }
}

/// Outcome of judging one creature at the end of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Remove the creature.
    Dies(DeathCause),
    /// Keep the creature; it does not reproduce.
    Survives,
    /// Keep the creature and add it to today's parents.
    Reproduces,
}

/// Judge a creature, updating its penalty in place.
///
/// The penalty always stays within `[0, 1]`.
pub fn judge(creature: &mut Creature, config: &BehaviorConfig) -> Verdict {
    match creature.eaten_candies {
        0 => Verdict::Dies(DeathCause::Starvation),
        n if n < MAX_EATEN_CANDIES => {
            creature.penalty = (creature.penalty + config.penalty_step).clamp(0.0, 1.0);
            if creature.penalty >= config.penalty_death_threshold {
                Verdict::Dies(DeathCause::Exhaustion)
            } else {
                Verdict::Survives
            }
        }
        _ => {
            creature.penalty = 0.0;
            Verdict::Reproduces
        }
    }
}
