//! Candies: passive food items that live for a single day.
//!
//! Every stage handler of a candy is a no-op. A candy exists to be sensed,
//! marked eaten, and swept away when the day ends.

use std::collections::BTreeMap;

use candied_types::{AgentId, Position};

/// A food item on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Candy {
    /// Identifier, unique across creatures and candies.
    pub id: AgentId,
    /// Where the candy lies.
    pub position: Position,
    /// Whether a creature has eaten it.
    pub eaten: bool,
}

impl Candy {
    /// Create an uneaten candy.
    pub const fn new(id: AgentId, position: Position) -> Self {
        Self {
            id,
            position,
            eaten: false,
        }
    }

    /// Start-of-day handler. Candies do nothing.
    pub const fn prepare_for_new_day(&self) {}

    /// Per-tick handler. Candies do nothing.
    pub const fn compete(&self) {}

    /// End-of-day handler. Candies do nothing.
    pub const fn report(&self) {}
}

/// Food a creature can look up and consume by id.
///
/// The creature handlers only ever see food through this seam, so the
/// population can store candies however it likes.
pub trait Pantry {
    /// Whether `id` names a candy that can still be eaten.
    fn is_uneaten(&self, id: AgentId) -> bool;

    /// Mark `id` as eaten. Returns `true` if it was uneaten before the call.
    fn consume(&mut self, id: AgentId) -> bool;
}

impl Pantry for BTreeMap<AgentId, Candy> {
    fn is_uneaten(&self, id: AgentId) -> bool {
        self.get(&id).is_some_and(|candy| !candy.eaten)
    }

    fn consume(&mut self, id: AgentId) -> bool {
        match self.get_mut(&id) {
            Some(candy) if !candy.eaten => {
                candy.eaten = true;
                true
            }
            _ => false,
        }
    }
}
