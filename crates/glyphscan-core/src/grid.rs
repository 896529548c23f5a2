//! Character grid being analyzed.

use serde::{Deserialize, Serialize};

/// A grid of glyphs, stored row by row.
///
/// Rows may have unequal lengths. A grid is treated as immutable input for a
/// detection pass; annotation produces a new grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grid {
    /// Row storage
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Create a grid from rows of characters.
    pub fn new(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    /// Create a grid from string rows.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.as_ref().chars().collect())
                .collect(),
        }
    }

    /// Parse newline-separated text. A trailing `\r` on each line is dropped.
    ///
    /// Empty text yields a grid with zero rows.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self::from_rows(text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)))
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True if there are no rows or every row is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Get a row.
    ///
    /// Returns None if the row is out of bounds.
    pub fn row(&self, row: usize) -> Option<&[char]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Length of a row, 0 when out of bounds.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Get the character at a position.
    ///
    /// Returns None if the position is out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Row content as a string, empty when out of bounds.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| r.iter().collect())
            .unwrap_or_default()
    }

    /// Rows joined with `\n`.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|r| r.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Consume the grid, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<char>> {
        self.rows
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
