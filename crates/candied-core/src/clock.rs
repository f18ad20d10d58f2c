//! Day counter for the simulation.
//!
//! The clock is the single source of truth for temporal state: the number
//! of completed days and whether the run is still going. `running` is
//! derived from the counter and never stored independently.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u32::MAX")]
    DayOverflow,

    /// The clock already reached its last day.
    #[error("simulation already finished after {max_days} days")]
    Finished {
        /// The configured number of days.
        max_days: u32,
    },
}

/// Counts completed days up to a fixed bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    /// Days completed so far.
    day: u32,

    /// Day at which the simulation stops.
    max_days: u32,
}

impl DayClock {
    /// Create a clock at day 0.
    ///
    /// A clock with `max_days == 0` is finished from the start.
    pub const fn new(max_days: u32) -> Self {
        Self { day: 0, max_days }
    }

    /// Days completed so far.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// The configured number of days.
    pub const fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Whether more days remain.
    pub const fn is_running(&self) -> bool {
        self.day < self.max_days
    }

    /// Number of the day currently being simulated (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Finished`] once no days remain.
    pub const fn current_day(&self) -> Result<u32, ClockError> {
        if !self.is_running() {
            return Err(ClockError::Finished {
                max_days: self.max_days,
            });
        }
        // day < max_days <= u32::MAX, so this cannot overflow.
        Ok(self.day.saturating_add(1))
    }

    /// Mark one more day as completed. Returns the new day count.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Finished`] if no days remain, or
    /// [`ClockError::DayOverflow`] if the counter would overflow.
    pub fn advance(&mut self) -> Result<u32, ClockError> {
        if !self.is_running() {
            return Err(ClockError::Finished {
                max_days: self.max_days,
            });
        }
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        Ok(self.day)
    }
}
