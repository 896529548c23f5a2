//! Core detection types and traits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use glyphscan_core::{Bounds, ElementKind, Grid, Position};

use crate::library::TemplateLibrary;

/// One candidate or accepted occurrence of a kind at a grid location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Element kind
    pub kind: ElementKind,
    /// Covered region (anchor is the top-left corner)
    pub bounds: Bounds,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Matched source text (single-line matches only)
    pub text: Option<String>,
    /// Text written into the grid in place of the match
    pub replacement: String,
}

impl Detection {
    /// Anchor position.
    pub fn position(&self) -> Position {
        self.bounds.origin()
    }

    /// Check if this detection covers any cell of another.
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.bounds.intersects(&other.bounds)
    }
}

/// Counters for one detection pass.
///
/// Nothing in a pass is fatal; everything that was dropped along the way is
/// counted here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanStats {
    /// Templates in the library
    pub templates_loaded: usize,
    /// Templates rejected when the library was built
    pub templates_rejected: usize,
    /// Rules rejected when the library was built
    pub rules_rejected: usize,
    /// Windows fully scored
    pub windows_scored: u64,
    /// Windows abandoned early because they could not reach the threshold
    pub windows_pruned: u64,
    /// Detections produced by all scanners
    pub raw_candidates: usize,
    /// Single-line matches dropped because their formatter failed
    pub formatter_failures: usize,
    /// Candidates dropped for overlapping an accepted detection
    pub conflicts_dropped: usize,
    /// Detections accepted by the resolver
    pub accepted: usize,
    /// Cell comparisons budgeted by the multi-row scanner
    pub work: u64,
    /// Whether the multi-row scanner stopped early on its work budget
    pub budget_exhausted: bool,
}

/// Trait for grid scanners.
pub trait Scanner: Send + Sync {
    /// Scanner name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Produce raw, possibly overlapping detections.
    fn scan(&self, grid: &Grid, library: &TemplateLibrary, stats: &mut ScanStats)
        -> Vec<Detection>;

    /// Whether this scanner is enabled.
    fn enabled(&self) -> bool {
        true
    }
}

/// Pairwise non-overlapping detections, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub(crate) fn from_accepted(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Number of detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// True if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Detections in acceptance order (descending confidence).
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    /// Detections ordered by (row, col).
    pub fn by_position(&self) -> Vec<&Detection> {
        let mut ordered: Vec<&Detection> = self.detections.iter().collect();
        ordered.sort_by_key(|d| d.position());
        ordered
    }

    /// Consume the set.
    pub fn into_vec(self) -> Vec<Detection> {
        self.detections
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
