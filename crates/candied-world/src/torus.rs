//! Toroidal plane geometry.
//!
//! Coordinates live in `[0, width) x [0, height)`. Positions handed to
//! [`Torus::wrap`] may lie anywhere and are folded back into range; every
//! delta is the shortest signed displacement across the seams, which is the
//! same as taking the nearest of the 3x3 periodic images.

use candied_types::Position;

use crate::error::WorldError;

/// A rectangular plane with wrap-around edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    width: f64,
    height: f64,
}

impl Torus {
    /// Create a plane of the given extents.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] unless both extents are
    /// positive and finite.
    pub fn new(width: f64, height: f64) -> Result<Self, WorldError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Horizontal extent.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Fold a position back into `[0, width) x [0, height)`.
    ///
    /// Non-finite coordinates collapse to 0.
    pub fn wrap(&self, position: Position) -> Position {
        Position::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    /// Shortest signed displacement `(dx, dy)` leading from `from` to `to`.
    pub fn delta(&self, from: Position, to: Position) -> (f64, f64) {
        (
            shortest_axis_delta(to.x - from.x, self.width),
            shortest_axis_delta(to.y - from.y, self.height),
        )
    }

    /// Shortest Euclidean distance between two positions.
    pub fn distance(&self, a: Position, b: Position) -> f64 {
        let (dx, dy) = self.delta(a, b);
        dx.hypot(dy)
    }

    /// Heading in radians of the shortest path from `from` to `to`.
    ///
    /// Returns `None` when the two positions coincide, since no direction is
    /// defined there.
    pub fn heading(&self, from: Position, to: Position) -> Option<f64> {
        let (dx, dy) = self.delta(from, to);
        if dx.hypot(dy) > 0.0 {
            Some(dy.atan2(dx))
        } else {
            None
        }
    }
}

fn wrap_axis(value: f64, extent: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negative inputs up to exactly `extent`.
    if wrapped >= extent { 0.0 } else { wrapped }
}

fn shortest_axis_delta(raw: f64, extent: f64) -> f64 {
    (raw / extent).round().mul_add(-extent, raw)
}
