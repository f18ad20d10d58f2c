//! Creatures: mobile foragers with a heritable genome.
//!
//! A creature runs three handlers per day, driven by the staged scheduler:
//!
//! 1. [`Creature::prepare_for_new_day`] -- reset telemetry, refill energy
//!    (minus the carried penalty), and cache today's tick cost.
//! 2. [`Creature::compete`] -- one sense, expend, move, eat cycle, repeated
//!    every tick while the creature is still active.
//! 3. [`Creature::report`] -- settle today's leftover energy and age.
//!
//! A creature is active while it has eaten fewer than two candies and its
//! energy strictly exceeds the cached tick cost. Once inactive it stays
//! inactive for the rest of the day.

use core::f64::consts::TAU;

use candied_types::{AgentId, Genome, Position};
use candied_world::{Neighbor, SpatialIndex};
use rand::Rng;
use tracing::trace;

use crate::candy::Pantry;
use crate::config::BehaviorConfig;
use crate::energy::{self, TickCost};
use crate::error::AgentError;

/// Most candies a creature eats in one day.
pub const MAX_EATEN_CANDIES: u8 = 2;

/// Telemetry gathered over one day; reset every morning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayTelemetry {
    /// Ticks in which the creature moved.
    pub done_steps: u32,
    /// Energy spent on the kinetic term.
    pub energy_used_for_movement: f64,
    /// Energy spent on the view-range term.
    pub energy_spent_on_view_range: f64,
    /// Energy spent on the focus term.
    pub energy_spent_on_focus_angle: f64,
    /// Leftover energy of a creature that ate fewer than two candies.
    pub energy_lost: Option<f64>,
    /// Leftover energy of a creature that ate two candies.
    pub energy_of_happiness: Option<f64>,
    /// Step count at which the first candy was eaten.
    pub moment_of_first_consumption: Option<u32>,
    /// Step count at which the second candy was eaten.
    pub moment_of_second_consumption: Option<u32>,
}

/// What a creature did during one `compete` tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The creature was inactive and did nothing.
    Idle,
    /// The creature moved without eating.
    Moved,
    /// The creature moved and ate the given candy.
    Ate(AgentId),
}

/// A mobile forager.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    /// Identifier, unique across creatures and candies.
    pub id: AgentId,
    /// Current position, always wrapped onto the plane.
    pub position: Position,
    /// Heritable traits.
    pub genome: Genome,
    /// Remaining energy for today.
    pub energy: f64,
    /// Candies eaten today, at most [`MAX_EATEN_CANDIES`].
    pub eaten_candies: u8,
    /// Fraction of energy withheld at the start of each day.
    pub penalty: f64,
    /// Heading of the last move, in radians within `[0, TAU)`.
    pub moving_angle: f64,
    /// Days survived.
    pub age: u32,
    /// Today's telemetry.
    pub telemetry: DayTelemetry,
    tick_cost: TickCost,
}

impl Creature {
    /// Create a newborn creature with full energy, no penalty, and a random
    /// initial heading.
    pub fn newborn(
        id: AgentId,
        position: Position,
        genome: Genome,
        max_energy: f64,
        config: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            position,
            genome,
            energy: max_energy,
            eaten_candies: 0,
            penalty: 0.0,
            moving_angle: rng.random_range(0.0..TAU),
            age: 0,
            telemetry: DayTelemetry::default(),
            tick_cost: energy::tick_cost(&genome, config),
        }
    }

    /// The cached per-tick cost for today.
    pub const fn tick_cost(&self) -> TickCost {
        self.tick_cost
    }

    /// Whether the creature still acts this tick.
    pub fn is_active(&self) -> bool {
        self.eaten_candies < MAX_EATEN_CANDIES && self.energy > self.tick_cost.total()
    }

    /// Start-of-day handler.
    ///
    /// Clears the eaten count and telemetry, sets energy to
    /// `(1 - penalty) * max_energy`, and caches today's tick cost.
    pub fn prepare_for_new_day(&mut self, max_energy: f64, config: &BehaviorConfig) {
        self.eaten_candies = 0;
        self.telemetry = DayTelemetry::default();
        self.energy = (1.0 - self.penalty) * max_energy;
        self.tick_cost = energy::tick_cost(&self.genome, config);
    }

    /// Per-tick handler: sense, expend, move, eat.
    ///
    /// The creature's new position is written to `space`; a candy it reaches
    /// is consumed through `pantry`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the creature is missing from `space`.
    pub fn compete(
        &mut self,
        space: &mut SpatialIndex,
        pantry: &mut dyn Pantry,
        config: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Result<TickOutcome, AgentError> {
        if !self.is_active() {
            return Ok(TickOutcome::Idle);
        }

        let food = self.sense(space, pantry);
        self.expend_energy();
        self.step_towards(food, space, config, rng)?;

        let Some(food) = food else {
            return Ok(TickOutcome::Moved);
        };
        if self.try_eat(&food, space, pantry, config) {
            trace!(
                creature = %self.id,
                candy = %food.id,
                step = self.telemetry.done_steps,
                eaten = self.eaten_candies,
                "Candy eaten"
            );
            Ok(TickOutcome::Ate(food.id))
        } else {
            Ok(TickOutcome::Moved)
        }
    }

    /// End-of-day handler.
    ///
    /// Records leftover energy as happiness after two candies, as loss
    /// otherwise, and ages the creature by one day.
    pub fn report(&mut self) {
        if self.eaten_candies >= MAX_EATEN_CANDIES {
            self.telemetry.energy_of_happiness = Some(self.energy);
        } else {
            self.telemetry.energy_lost = Some(self.energy);
        }
        self.age = self.age.saturating_add(1);
    }

    /// Nearest uneaten candy within view range, if any.
    fn sense(&self, space: &SpatialIndex, pantry: &dyn Pantry) -> Option<Neighbor> {
        space
            .neighbors_within(self.position, self.genome.view_range)
            .into_iter()
            .find(|neighbor| pantry.is_uneaten(neighbor.id))
    }

    fn expend_energy(&mut self) {
        let cost = self.tick_cost;
        self.energy -= cost.total();
        self.telemetry.energy_used_for_movement += cost.movement;
        self.telemetry.energy_spent_on_focus_angle += cost.focus;
        self.telemetry.energy_spent_on_view_range += cost.view;
    }

    /// Move `speed` units: towards `food` within the focus cone, or along a
    /// correlated random walk when nothing is in sight.
    fn step_towards(
        &mut self,
        food: Option<Neighbor>,
        space: &mut SpatialIndex,
        config: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Result<(), AgentError> {
        let heading = match food {
            Some(food) => {
                // Standing on the candy: any heading will do.
                let direct = space
                    .torus()
                    .heading(self.position, food.position)
                    .unwrap_or(0.0);
                direct + symmetric_draw(rng, steering_half_width(self.genome.focus_angle))
            }
            None => self.moving_angle + symmetric_draw(rng, config.wander_half_angle),
        };

        let target = self.position.advanced(heading, self.genome.speed);
        self.position = space.move_to(self.id, target)?;
        self.moving_angle = normalize_angle(heading);
        self.telemetry.done_steps = self.telemetry.done_steps.saturating_add(1);
        Ok(())
    }

    fn try_eat(
        &mut self,
        food: &Neighbor,
        space: &SpatialIndex,
        pantry: &mut dyn Pantry,
        config: &BehaviorConfig,
    ) -> bool {
        let capture_radius = config.capture_radius_factor * self.genome.speed;
        if space.distance(self.position, food.position) >= capture_radius {
            return false;
        }
        if !pantry.consume(food.id) {
            return false;
        }

        self.eaten_candies = self.eaten_candies.saturating_add(1).min(MAX_EATEN_CANDIES);
        let step = self.telemetry.done_steps;
        if self.telemetry.moment_of_first_consumption.is_none() {
            self.telemetry.moment_of_first_consumption = Some(step);
        } else if self.telemetry.moment_of_second_consumption.is_none() {
            self.telemetry.moment_of_second_consumption = Some(step);
        }
        true
    }
}

/// Half-width of the steering cone, clamped into `[0, PI]`.
fn steering_half_width(focus_angle: f64) -> f64 {
    if focus_angle.is_nan() {
        0.0
    } else {
        focus_angle.clamp(0.0, core::f64::consts::PI)
    }
}

/// Uniform draw from `[-half_width, half_width]`; zero for an empty range.
fn symmetric_draw(rng: &mut impl Rng, half_width: f64) -> f64 {
    if half_width > 0.0 && half_width.is_finite() {
        rng.random_range(-half_width..=half_width)
    } else {
        0.0
    }
}

fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}
