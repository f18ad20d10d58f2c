//! Uniform-grid spatial index over agent positions on a [`Torus`].
//!
//! Agents are bucketed into a grid of `floor(width / cell_size)` columns and
//! `floor(height / cell_size)` rows whose cells tile the plane exactly, so
//! every cell is at least `cell_size` on a side. A radius query visits only the
//! cells overlapping the bounding box of the query disc, wrapping cell
//! indices across the seams, then filters candidates by exact toroidal
//! distance.
//!
//! Insert, remove, and move are O(1) amortized plus the size of one cell.
//! Query results are ordered by distance, ties broken by agent id, so the
//! index never introduces nondeterminism into a seeded run.

use std::collections::HashMap;

use candied_types::{AgentId, Position};
use tracing::debug;

use crate::error::WorldError;
use crate::torus::Torus;

/// Upper bound on cells per axis; smaller requested cells are enlarged.
const MAX_CELLS_PER_AXIS: usize = 1024;

/// Grid cell coordinates `(column, row)`.
pub type CellKey = (usize, usize);

/// An agent found by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// The agent found.
    pub id: AgentId,
    /// Its indexed position.
    pub position: Position,
    /// Toroidal distance from the query centre.
    pub distance: f64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    position: Position,
    cell: CellKey,
}

/// Grid-bucketed positions of every agent on the plane.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    torus: Torus,
    cell_width: f64,
    cell_height: f64,
    columns: usize,
    rows: usize,
    cells: HashMap<CellKey, Vec<AgentId>>,
    entries: HashMap<AgentId, Entry>,
}

impl SpatialIndex {
    /// Create an empty index over `torus` with the requested cell size.
    ///
    /// A cell size close to the largest query radius keeps queries to a
    /// 3x3 block of cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCellSize`] unless `cell_size` is positive
    /// and finite.
    pub fn new(torus: Torus, cell_size: f64) -> Result<Self, WorldError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(WorldError::InvalidCellSize(cell_size));
        }

        let columns = cells_along(torus.width(), cell_size);
        let rows = cells_along(torus.height(), cell_size);
        let cell_width = torus.width() / usize_to_f64(columns);
        let cell_height = torus.height() / usize_to_f64(rows);

        debug!(
            width = torus.width(),
            height = torus.height(),
            cell_width,
            cell_height,
            columns,
            rows,
            "Spatial index created"
        );

        Ok(Self {
            torus,
            cell_width,
            cell_height,
            columns,
            rows,
            cells: HashMap::new(),
            entries: HashMap::new(),
        })
    }

    /// The plane this index covers.
    pub const fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Number of indexed agents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no agents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed position of `id`, if present.
    pub fn position(&self, id: AgentId) -> Option<Position> {
        self.entries.get(&id).map(|entry| entry.position)
    }

    /// Shortest toroidal distance between two positions.
    pub fn distance(&self, a: Position, b: Position) -> f64 {
        self.torus.distance(a, b)
    }

    /// Place a new agent. The position is wrapped onto the plane first and
    /// the wrapped position is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateAgent`] if `id` is already indexed.
    pub fn insert(&mut self, id: AgentId, position: Position) -> Result<Position, WorldError> {
        if self.entries.contains_key(&id) {
            return Err(WorldError::DuplicateAgent(id));
        }
        let position = self.torus.wrap(position);
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(id);
        self.entries.insert(id, Entry { position, cell });
        Ok(position)
    }

    /// Remove an agent, returning its last indexed position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `id` is not indexed.
    pub fn remove(&mut self, id: AgentId) -> Result<Position, WorldError> {
        let entry = self
            .entries
            .remove(&id)
            .ok_or(WorldError::AgentNotFound(id))?;
        self.detach(id, entry.cell);
        Ok(entry.position)
    }

    /// Move an agent. The position is wrapped onto the plane first and the
    /// wrapped position is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `id` is not indexed.
    pub fn move_to(&mut self, id: AgentId, position: Position) -> Result<Position, WorldError> {
        let position = self.torus.wrap(position);
        let cell = self.cell_of(position);
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(WorldError::AgentNotFound(id))?;
        let previous = entry.cell;
        entry.position = position;
        entry.cell = cell;
        if previous != cell {
            self.detach(id, previous);
            self.cells.entry(cell).or_default().push(id);
        }
        Ok(position)
    }

    /// Every indexed agent within `radius` of `center`, the boundary and the
    /// centre itself included, nearest first.
    ///
    /// A negative or non-finite radius matches nothing.
    pub fn neighbors_within(&self, center: Position, radius: f64) -> Vec<Neighbor> {
        if !(radius >= 0.0 && radius.is_finite()) || self.entries.is_empty() {
            return Vec::new();
        }
        let center = self.torus.wrap(center);

        let columns = axis_span(center.x, radius, self.cell_width, self.columns);
        let rows = axis_span(center.y, radius, self.cell_height, self.rows);

        let mut found = Vec::new();
        for &column in &columns {
            for &row in &rows {
                let Some(bucket) = self.cells.get(&(column, row)) else {
                    continue;
                };
                for &id in bucket {
                    let Some(entry) = self.entries.get(&id) else {
                        continue;
                    };
                    let distance = self.torus.distance(center, entry.position);
                    if distance <= radius {
                        found.push(Neighbor {
                            id,
                            position: entry.position,
                            distance,
                        });
                    }
                }
            }
        }

        found.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        found
    }

    fn detach(&mut self, id: AgentId, cell: CellKey) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            if let Some(slot) = bucket.iter().position(|other| *other == id) {
                bucket.swap_remove(slot);
            }
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    fn cell_of(&self, position: Position) -> CellKey {
        (
            cell_index(position.x, self.cell_width, self.columns),
            cell_index(position.y, self.cell_height, self.rows),
        )
    }
}

/// Number of whole cells of at least `cell_size` along `extent`, clamped to
/// `1..=MAX_CELLS_PER_AXIS`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cells_along(extent: f64, cell_size: f64) -> usize {
    // Both operands are positive and finite, and the result is clamped
    // before the cast.
    let raw = (extent / cell_size).floor().clamp(1.0, usize_to_f64(MAX_CELLS_PER_AXIS));
    raw as usize
}

/// Cell index of a wrapped coordinate, clamped into `0..count`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_index(coordinate: f64, cell_size: f64, count: usize) -> usize {
    let last = count.saturating_sub(1);
    let raw = (coordinate / cell_size).floor().clamp(0.0, usize_to_f64(last));
    raw as usize
}

/// Distinct cell indices along one axis overlapping `[center - radius, center + radius]`.
#[allow(clippy::cast_possible_truncation)]
fn axis_span(center: f64, radius: f64, cell_size: f64, count: usize) -> Vec<usize> {
    let first = ((center - radius) / cell_size).floor();
    let last = ((center + radius) / cell_size).floor();
    let count_f = usize_to_f64(count);
    if last - first + 1.0 >= count_f {
        return (0..count).collect();
    }
    // The span is shorter than `count`, so both ends fit comfortably in i64.
    let first = first as i64;
    let last = last as i64;
    let modulus = i64::try_from(count).unwrap_or(i64::MAX);
    (first..=last)
        .filter_map(|raw| usize::try_from(raw.rem_euclid(modulus)).ok())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}
