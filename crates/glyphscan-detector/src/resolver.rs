//! Conflict resolution between overlapping detections.
//!
//! Greedy weighted independent-set selection over cell occupancy: the
//! strongest candidate wins its cells, anything touching them afterwards is
//! dropped. This is not globally optimal (a different order can yield a
//! higher total confidence) and is not meant to be.

use std::cmp::Ordering;
use std::collections::HashSet;

use glyphscan_core::{Bounds, Position};

use crate::detection::{Detection, DetectionSet, ScanStats};

/// Cells claimed by accepted detections.
#[derive(Debug, Clone, Default)]
pub struct ClaimMap {
    cells: HashSet<Position>,
}

impl ClaimMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any cell of `bounds` is already claimed.
    pub fn is_claimed(&self, bounds: &Bounds) -> bool {
        bounds.cells().any(|cell| self.cells.contains(&cell))
    }

    /// Claim every cell of `bounds`.
    pub fn claim(&mut self, bounds: &Bounds) {
        self.cells.extend(bounds.cells());
    }

    /// Number of claimed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if nothing is claimed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Acceptance order: confidence descending, then row, then column.
fn acceptance_order(a: &Detection, b: &Detection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then(a.bounds.row.cmp(&b.bounds.row))
        .then(a.bounds.col.cmp(&b.bounds.col))
}

/// Select a pairwise non-overlapping subset of `candidates`.
///
/// The sort is stable, so candidates tied on confidence and anchor keep
/// their scan order.
pub fn resolve(mut candidates: Vec<Detection>, stats: &mut ScanStats) -> DetectionSet {
    candidates.sort_by(acceptance_order);

    let mut claims = ClaimMap::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        if claims.is_claimed(&candidate.bounds) {
            tracing::trace!(
                "Dropping {} at {:?}: overlaps an accepted detection",
                candidate.kind,
                candidate.position()
            );
            stats.conflicts_dropped += 1;
            continue;
        }
        claims.claim(&candidate.bounds);
        accepted.push(candidate);
    }

    stats.accepted = accepted.len();
    DetectionSet::from_accepted(accepted)
}
