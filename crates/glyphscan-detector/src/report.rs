//! Ordered, human-readable detection report.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use glyphscan_core::{ElementKind, Result};

use crate::detection::{Detection, DetectionSet};

/// One reported detection, in 1-based coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEntry {
    /// 1-based row of the anchor
    pub row: usize,
    /// 1-based column of the anchor
    pub col: usize,
    /// Element kind
    pub kind: ElementKind,
    /// Confidence as a percentage (0-100)
    pub confidence: f64,
    /// Matched source text, if captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement written into the grid
    pub replacement: String,
    /// Covered width in cells
    pub width: usize,
    /// Covered height in rows
    pub height: usize,
}

impl ReportEntry {
    /// Build an entry from a detection, rounding confidence to `decimals`
    /// places of a percentage.
    pub fn from_detection(detection: &Detection, decimals: u8) -> Self {
        let (row, col) = detection.position().one_based();
        Self {
            row,
            col,
            kind: detection.kind,
            confidence: to_percent(detection.confidence, decimals),
            text: detection.text.clone(),
            replacement: detection.replacement.clone(),
            width: detection.bounds.width,
            height: detection.bounds.height,
        }
    }

    /// One summary line, e.g. `[3:5] arrow_down (conf: 95%)`.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "[{}:{}] {} (conf: {}%)",
            self.row, self.col, self.kind, self.confidence
        );
        if let Some(text) = &self.text {
            line.push_str(" - ");
            line.push_str(text);
        }
        line
    }
}

fn to_percent(confidence: f64, decimals: u8) -> f64 {
    let scale = 10f64.powi(i32::from(decimals.min(1)));
    (confidence * 100.0 * scale).round() / scale
}

/// Detections of one pass, ordered by (row, col).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionReport {
    /// Entries in (row, col) order
    pub entries: Vec<ReportEntry>,
    /// Entry count per kind
    pub counts: BTreeMap<ElementKind, usize>,
}

impl DetectionReport {
    /// Build a report from an accepted set.
    pub fn from_set(set: &DetectionSet, decimals: u8) -> Self {
        let entries: Vec<ReportEntry> = set
            .by_position()
            .into_iter()
            .map(|d| ReportEntry::from_detection(d, decimals))
            .collect();

        let mut counts = BTreeMap::new();
        for entry in &entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }

        Self { entries, counts }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries at a 1-based location.
    pub fn entries_at(&self, row: usize, col: usize) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(move |e| e.row == row && e.col == col)
    }

    /// Count of one kind.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Summary lines, one per entry.
    pub fn summary(&self) -> Vec<String> {
        self.entries.iter().map(ReportEntry::summary_line).collect()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detected {} element(s)", self.entries.len())?;
        for (kind, count) in &self.counts {
            writeln!(f, "  {kind}: {count}")?;
        }
        for line in self.summary() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
