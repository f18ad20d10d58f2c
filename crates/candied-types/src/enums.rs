//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

/// The two kinds of agents living on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// A mobile forager with a heritable genome.
    Creature,
    /// A passive food item, present for a single day.
    Candy,
}

impl core::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Creature => write!(f, "Creature"),
            Self::Candy => write!(f, "Candy"),
        }
    }
}

/// Shape drawn for an agent by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// A circle centred on the agent position.
    Circle,
}

/// Fill color drawn for an agent by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Creature that has not eaten yet today.
    Red,
    /// Creature that has eaten one candy.
    Yellow,
    /// Creature that has eaten two candies.
    Green,
    /// Candy.
    Blue,
}
