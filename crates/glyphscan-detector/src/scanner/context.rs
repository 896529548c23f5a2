//! Context multipliers for multi-row matches.
//!
//! A [`ContextScorer`] looks around a candidate window and returns a factor
//! applied to its confidence. The scanner caps the final confidence at 1.0.

use glyphscan_core::{Bounds, Grid};

/// Hook for adjusting multi-row confidence from surrounding cells.
pub trait ContextScorer: Send + Sync {
    /// Scorer name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Multiplier for a window, in [1, `max_multiplier()`].
    fn multiplier(&self, grid: &Grid, window: &Bounds) -> f64;

    /// Largest value `multiplier` can return. Used to prune windows early.
    fn max_multiplier(&self) -> f64 {
        1.0
    }
}

/// No context adjustment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl ContextScorer for NoContext {
    fn name(&self) -> &'static str {
        "none"
    }

    fn multiplier(&self, _grid: &Grid, _window: &Bounds) -> f64 {
        1.0
    }
}

/// Border and keyword proximity bonus.
///
/// ×1.1 for a horizontal border run directly above the window, ×1.1 for one
/// directly below, ×1.2 if a row within `radius` rows mentions a keyword.
pub struct KeywordContext {
    keywords: Vec<String>,
    radius: usize,
    cap: f64,
}

const HORIZONTAL_BORDERS: &[char] = &['─', '━', '═'];
const BORDER_BONUS: f64 = 1.1;
const KEYWORD_BONUS: f64 = 1.2;

impl KeywordContext {
    /// Create a scorer with the default action keywords.
    pub fn new() -> Self {
        Self {
            keywords: ["download", "pause", "resume", "update", "play", "stop"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            radius: 3,
            cap: 1.5,
        }
    }

    /// Replace the keyword list. Keywords match case-insensitively.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(|k| k.into().to_lowercase()).collect();
        self
    }

    /// Set how many rows above and below the window are searched.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    fn border_run(&self, grid: &Grid, row: usize, window: &Bounds) -> bool {
        let run = window.width.min(3);
        (window.col..window.col + run).all(|col| {
            grid.cell(row, col)
                .is_some_and(|ch| HORIZONTAL_BORDERS.contains(&ch))
        })
    }

    fn keyword_nearby(&self, grid: &Grid, window: &Bounds) -> bool {
        let first = window.row.saturating_sub(self.radius);
        let last = (window.bottom() + self.radius).min(grid.height());
        (first..last).any(|row| {
            let text = grid.row_text(row).to_lowercase();
            self.keywords.iter().any(|k| text.contains(k.as_str()))
        })
    }
}

impl Default for KeywordContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextScorer for KeywordContext {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn multiplier(&self, grid: &Grid, window: &Bounds) -> f64 {
        let mut factor = 1.0;

        if window.row > 0 && self.border_run(grid, window.row - 1, window) {
            factor *= BORDER_BONUS;
        }
        if self.border_run(grid, window.bottom(), window) {
            factor *= BORDER_BONUS;
        }
        if self.keyword_nearby(grid, window) {
            factor *= KEYWORD_BONUS;
        }

        factor.min(self.cap)
    }

    fn max_multiplier(&self) -> f64 {
        self.cap
    }
}
