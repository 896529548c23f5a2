//! Region extraction with blank padding.

use glyphscan_core::{Bounds, Grid};

/// A rectangular copy of grid cells. Always exactly `height` rows of
/// exactly `width` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Region {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Region rows.
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Rows as strings.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.iter().collect()).collect()
    }
}

/// Extract `height` x `width` cells at (`row`, `col`).
///
/// Cells beyond the last row or past the end of a short row are filled with
/// `blank`. Never fails and never returns a ragged region.
pub fn extract(
    grid: &Grid,
    row: usize,
    col: usize,
    height: usize,
    width: usize,
    blank: char,
) -> Region {
    let rows = (row..row + height)
        .map(|r| {
            let source = grid.row(r).unwrap_or(&[]);
            (col..col + width)
                .map(|c| source.get(c).copied().unwrap_or(blank))
                .collect()
        })
        .collect();
    Region { rows, width }
}

/// Extract the cells covered by `bounds`.
pub fn extract_bounds(grid: &Grid, bounds: &Bounds, blank: char) -> Region {
    extract(grid, bounds.row, bounds.col, bounds.height, bounds.width, blank)
}
