//! The live agents of one simulation and their spatial index.
//!
//! Creatures and candies are kept in two id-ordered maps; every live agent
//! is also registered in the [`SpatialIndex`] under the same id. All
//! mutations go through [`Population`] so the maps and the index never
//! disagree.

use std::collections::BTreeMap;

use candied_agents::{Candy, Creature};
use candied_types::AgentId;
use candied_world::{SpatialIndex, Torus, WorldError};

/// A tagged reference to one live agent, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgentHandle {
    /// A creature, by id.
    Creature(AgentId),
    /// A candy, by id.
    Candy(AgentId),
}

/// Live creatures and candies on the plane.
#[derive(Debug, Clone)]
pub struct Population {
    pub(crate) space: SpatialIndex,
    pub(crate) creatures: BTreeMap<AgentId, Creature>,
    pub(crate) candies: BTreeMap<AgentId, Candy>,
}

impl Population {
    /// Create an empty population on `torus`, bucketing the index by
    /// `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCellSize`] if `cell_size` is unusable.
    pub fn new(torus: Torus, cell_size: f64) -> Result<Self, WorldError> {
        Ok(Self {
            space: SpatialIndex::new(torus, cell_size)?,
            creatures: BTreeMap::new(),
            candies: BTreeMap::new(),
        })
    }

    /// The spatial index over every live agent.
    pub const fn space(&self) -> &SpatialIndex {
        &self.space
    }

    /// Live creatures by id.
    pub const fn creatures(&self) -> &BTreeMap<AgentId, Creature> {
        &self.creatures
    }

    /// Mutable access to a live creature.
    ///
    /// The index is not told about position changes made through this
    /// handle.
    pub fn creature_mut(&mut self, id: AgentId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    /// Today's candies by id.
    pub const fn candies(&self) -> &BTreeMap<AgentId, Candy> {
        &self.candies
    }

    /// Number of live creatures.
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Number of candies on the plane.
    pub fn candy_count(&self) -> usize {
        self.candies.len()
    }

    /// Every live agent, creatures first, each group in id order.
    pub fn handles(&self) -> Vec<AgentHandle> {
        self.creatures
            .keys()
            .copied()
            .map(AgentHandle::Creature)
            .chain(self.candies.keys().copied().map(AgentHandle::Candy))
            .collect()
    }

    /// Place a creature, wrapping its position onto the plane.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateAgent`] if the id is already live.
    pub fn add_creature(&mut self, mut creature: Creature) -> Result<(), WorldError> {
        creature.position = self.space.insert(creature.id, creature.position)?;
        self.creatures.insert(creature.id, creature);
        Ok(())
    }

    /// Place a candy, wrapping its position onto the plane.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateAgent`] if the id is already live.
    pub fn add_candy(&mut self, mut candy: Candy) -> Result<(), WorldError> {
        candy.position = self.space.insert(candy.id, candy.position)?;
        self.candies.insert(candy.id, candy);
        Ok(())
    }

    /// Remove a creature from the plane.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if no such creature is live.
    pub fn remove_creature(&mut self, id: AgentId) -> Result<Creature, WorldError> {
        let creature = self
            .creatures
            .remove(&id)
            .ok_or(WorldError::AgentNotFound(id))?;
        self.space.remove(id)?;
        Ok(creature)
    }

    /// Remove every candy, eaten or not. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if a candy was missing from the
    /// index.
    pub fn clear_candies(&mut self) -> Result<usize, WorldError> {
        let candies = core::mem::take(&mut self.candies);
        for id in candies.keys() {
            self.space.remove(*id)?;
        }
        Ok(candies.len())
    }
}
