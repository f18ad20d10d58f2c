//! Monotonic agent identifiers.
//!
//! Creatures and candies share one id space. Ids are handed out in
//! increasing order and never reused, even after the agent is removed.

use candied_types::AgentId;

/// Errors that can occur when allocating ids.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Every `u64` id has been handed out.
    #[error("agent id space exhausted")]
    Exhausted,
}

/// Hands out fresh [`AgentId`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 0.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next id.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Exhausted`] once `u64::MAX` has been reached.
    pub fn allocate(&mut self) -> Result<AgentId, IdError> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(IdError::Exhausted)?;
        Ok(AgentId::from_raw(id))
    }
}
