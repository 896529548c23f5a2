//! Geometry types for grid coordinates and regions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Position in the grid (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// The same position in 1-based (row, col) form, as shown in reports.
    pub fn one_based(&self) -> (usize, usize) {
        (self.row + 1, self.col + 1)
    }
}

/// Bounding box for a grid region.
///
/// The extent may reach past the end of a short row; cells out there are
/// treated as blank by the region extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Bounds {
    /// Starting row
    pub row: usize,
    /// Starting column
    pub col: usize,
    /// Width in columns
    pub width: usize,
    /// Height in rows
    pub height: usize,
}

impl Bounds {
    /// Create new bounds.
    pub fn new(row: usize, col: usize, width: usize, height: usize) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// One past the last row.
    pub fn bottom(&self) -> usize {
        self.row + self.height
    }

    /// One past the last column.
    pub fn right(&self) -> usize {
        self.col + self.width
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check if a position is contained within these bounds.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.row >= self.row
            && pos.row < self.bottom()
            && pos.col >= self.col
            && pos.col < self.right()
    }

    /// Check if these bounds intersect with another bounds.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.bottom() <= other.row
            || other.bottom() <= self.row
            || self.right() <= other.col
            || other.right() <= self.col)
    }

    /// Iterate over every covered cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.row..self.bottom())
            .flat_map(move |row| (self.col..self.right()).map(move |col| Position::new(row, col)))
    }
}
