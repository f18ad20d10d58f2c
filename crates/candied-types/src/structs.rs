//! Core value structs: positions, genomes, and rendering portrayals.

use serde::{Deserialize, Serialize};

use crate::enums::{Color, Shape};

/// A point on the continuous plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its two coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this position by `distance` units along `heading` (radians).
    pub fn advanced(self, heading: f64, distance: f64) -> Self {
        Self {
            x: heading.cos().mul_add(distance, self.x),
            y: heading.sin().mul_add(distance, self.y),
        }
    }
}

/// The four heritable traits of a creature.
///
/// Values are deliberately unconstrained: mutation can push any gene below
/// zero, and every consumer must tolerate that.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Genome {
    /// Distance covered per tick.
    pub speed: f64,
    /// Half-width of the steering cone around the direction to food, in radians.
    pub focus_angle: f64,
    /// Radius within which candies are sensed.
    pub view_range: f64,
    /// Standard deviation of the per-gene mutation noise.
    pub mut_rate: f64,
}

impl Genome {
    /// Number of genes in a genome.
    pub const GENE_COUNT: usize = 4;

    /// Return the genes in canonical order: speed, focus, view, mutation rate.
    pub const fn genes(&self) -> [f64; Self::GENE_COUNT] {
        [self.speed, self.focus_angle, self.view_range, self.mut_rate]
    }

    /// Build a genome from genes in canonical order.
    pub const fn from_genes(genes: [f64; Self::GENE_COUNT]) -> Self {
        let [speed, focus_angle, view_range, mut_rate] = genes;
        Self {
            speed,
            focus_angle,
            view_range,
            mut_rate,
        }
    }
}

/// What a renderer needs to draw one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portrayal {
    /// Where to draw the agent.
    pub position: Position,
    /// Outline of the agent.
    pub shape: Shape,
    /// Fill color.
    pub color: Color,
    /// Draw order; lower layers are drawn first.
    pub layer: u8,
    /// Radius in canvas units.
    pub radius: f64,
    /// Whether the shape is filled.
    pub filled: bool,
}
