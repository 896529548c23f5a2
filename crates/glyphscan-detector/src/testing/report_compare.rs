//! Report comparison engine for regression testing.
//!
//! Compares an expected (golden) detection report with a fresh one and lists
//! entries that appeared, disappeared or changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use glyphscan_core::ElementKind;

use crate::report::{DetectionReport, ReportEntry};

/// Describes a change to a single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryChange {
    /// Entry was added (not in expected)
    Added,
    /// Entry was removed (was in expected)
    Removed,
    /// Covered width/height changed
    ExtentChanged {
        /// Expected (width, height)
        expected: (usize, usize),
        /// Actual (width, height)
        actual: (usize, usize),
    },
    /// Replacement text changed
    ReplacementChanged {
        /// Expected replacement
        expected: String,
        /// Actual replacement
        actual: String,
    },
    /// Captured source text changed
    TextChanged {
        /// Expected source text
        expected: Option<String>,
        /// Actual source text
        actual: Option<String>,
    },
    /// Confidence percentage moved past the tolerance
    ConfidenceChanged {
        /// Expected percentage
        expected: f64,
        /// Actual percentage
        actual: f64,
    },
}

/// Difference for a single entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDiff {
    /// Element kind
    pub kind: ElementKind,
    /// 1-based (row, col) of the entry
    pub position: (usize, usize),
    /// List of changes
    pub changes: Vec<EntryChange>,
}

impl EntryDiff {
    fn new(entry: &ReportEntry, changes: Vec<EntryChange>) -> Self {
        Self {
            kind: entry.kind,
            position: (entry.row, entry.col),
            changes,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportDiff {
    /// Entries in actual but not expected
    pub added: Vec<EntryDiff>,
    /// Entries in expected but not actual
    pub removed: Vec<EntryDiff>,
    /// Entries present in both with differences
    pub modified: Vec<EntryDiff>,
    /// Summary statistics
    pub stats: DiffStats,
}

/// Summary statistics for a report diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffStats {
    /// Entries in the expected report
    pub expected_count: usize,
    /// Entries in the actual report
    pub actual_count: usize,
    /// Entries added
    pub added_count: usize,
    /// Entries removed
    pub removed_count: usize,
    /// Entries modified
    pub modified_count: usize,
    /// Entries unchanged
    pub unchanged_count: usize,
}

impl ReportDiff {
    /// Check if the reports are equivalent.
    pub fn is_match(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of differences.
    pub fn diff_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_match() {
            return "Reports match".to_string();
        }

        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("{} added", self.added.len()));
        }
        if !self.removed.is_empty() {
            parts.push(format!("{} removed", self.removed.len()));
        }
        if !self.modified.is_empty() {
            parts.push(format!("{} modified", self.modified.len()));
        }

        format!("Differences: {}", parts.join(", "))
    }

    /// One line per difference, for test failure messages.
    pub fn details(&self) -> Vec<String> {
        let tagged = self
            .added
            .iter()
            .map(|d| ("+", d))
            .chain(self.removed.iter().map(|d| ("-", d)))
            .chain(self.modified.iter().map(|d| ("~", d)));

        tagged
            .map(|(tag, d)| {
                format!(
                    "{tag} [{}:{}] {} {:?}",
                    d.position.0, d.position.1, d.kind, d.changes
                )
            })
            .collect()
    }
}

/// Report matcher for comparing detection results.
#[derive(Debug, Clone, Default)]
pub struct ReportMatcher {
    /// Allowed anchor drift in cells, per axis
    pub position_tolerance: usize,
    /// Allowed confidence drift in percentage points; `None` ignores confidence
    pub confidence_tolerance: Option<f64>,
}

impl ReportMatcher {
    /// Create a matcher that requires exact positions and ignores confidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set position tolerance.
    pub fn with_position_tolerance(mut self, tolerance: usize) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    /// Compare confidence, allowing `tolerance` percentage points of drift.
    pub fn with_confidence_tolerance(mut self, tolerance: f64) -> Self {
        self.confidence_tolerance = Some(tolerance);
        self
    }

    /// Compare two reports.
    pub fn compare(&self, expected: &DetectionReport, actual: &DetectionReport) -> ReportDiff {
        self.compare_entries(&expected.entries, &actual.entries)
    }

    /// Compare two entry lists.
    pub fn compare_entries(&self, expected: &[ReportEntry], actual: &[ReportEntry]) -> ReportDiff {
        let mut diff = ReportDiff::default();
        diff.stats.expected_count = expected.len();
        diff.stats.actual_count = actual.len();

        let actual_by_kind = Self::index_by_kind(actual);
        let mut matched_actual = vec![false; actual.len()];

        for exp in expected {
            let candidates = actual_by_kind.get(&exp.kind).map(Vec::as_slice).unwrap_or(&[]);
            let found = candidates
                .iter()
                .copied()
                .find(|&idx| !matched_actual[idx] && self.same_location(exp, &actual[idx]));

            match found {
                Some(idx) => {
                    matched_actual[idx] = true;
                    let changes = self.compare_entry(exp, &actual[idx]);
                    if changes.is_empty() {
                        diff.stats.unchanged_count += 1;
                    } else {
                        diff.modified.push(EntryDiff::new(exp, changes));
                        diff.stats.modified_count += 1;
                    }
                }
                None => {
                    diff.removed.push(EntryDiff::new(exp, vec![EntryChange::Removed]));
                    diff.stats.removed_count += 1;
                }
            }
        }

        for (idx, act) in actual.iter().enumerate() {
            if !matched_actual[idx] {
                diff.added.push(EntryDiff::new(act, vec![EntryChange::Added]));
                diff.stats.added_count += 1;
            }
        }

        diff
    }

    fn index_by_kind(entries: &[ReportEntry]) -> BTreeMap<ElementKind, Vec<usize>> {
        let mut map: BTreeMap<ElementKind, Vec<usize>> = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            map.entry(entry.kind).or_default().push(idx);
        }
        map
    }

    fn same_location(&self, a: &ReportEntry, b: &ReportEntry) -> bool {
        a.row.abs_diff(b.row) <= self.position_tolerance
            && a.col.abs_diff(b.col) <= self.position_tolerance
    }

    fn compare_entry(&self, expected: &ReportEntry, actual: &ReportEntry) -> Vec<EntryChange> {
        let mut changes = Vec::new();

        if (expected.width, expected.height) != (actual.width, actual.height) {
            changes.push(EntryChange::ExtentChanged {
                expected: (expected.width, expected.height),
                actual: (actual.width, actual.height),
            });
        }

        if expected.replacement != actual.replacement {
            changes.push(EntryChange::ReplacementChanged {
                expected: expected.replacement.clone(),
                actual: actual.replacement.clone(),
            });
        }

        if expected.text != actual.text {
            changes.push(EntryChange::TextChanged {
                expected: expected.text.clone(),
                actual: actual.text.clone(),
            });
        }

        if let Some(tolerance) = self.confidence_tolerance {
            if (expected.confidence - actual.confidence).abs() > tolerance {
                changes.push(EntryChange::ConfidenceChanged {
                    expected: expected.confidence,
                    actual: actual.confidence,
                });
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: ElementKind, row: usize, col: usize, confidence: f64) -> ReportEntry {
        ReportEntry {
            row,
            col,
            kind,
            confidence,
            text: None,
            replacement: kind.symbol().to_string(),
            width: 3,
            height: 2,
        }
    }

    #[test]
    fn test_identical_reports() {
        let expected = vec![
            entry(ElementKind::ArrowDown, 1, 1, 95.0),
            entry(ElementKind::ArrowUp, 4, 10, 90.0),
        ];
        let diff = ReportMatcher::new().compare_entries(&expected, &expected.clone());

        assert!(diff.is_match());
        assert_eq!(diff.stats.unchanged_count, 2);
        assert_eq!(diff.summary(), "Reports match");
    }

    #[test]
    fn test_added_and_removed() {
        let expected = vec![entry(ElementKind::ArrowDown, 1, 1, 95.0)];
        let actual = vec![entry(ElementKind::ArrowUp, 1, 1, 95.0)];
        let diff = ReportMatcher::new().compare_entries(&expected, &actual);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.added[0].kind, ElementKind::ArrowUp);
        assert_eq!(diff.summary(), "Differences: 1 added, 1 removed");
        assert_eq!(diff.details().len(), 2);
    }

    #[test]
    fn test_modified_replacement() {
        let expected = vec![entry(ElementKind::ProgressBar, 2, 1, 90.0)];
        let mut changed = entry(ElementKind::ProgressBar, 2, 1, 90.0);
        changed.replacement = "[██________] 20%".to_string();
        let diff = ReportMatcher::new().compare_entries(&expected, &[changed]);

        assert_eq!(diff.modified.len(), 1);
        assert!(matches!(
            diff.modified[0].changes[0],
            EntryChange::ReplacementChanged { .. }
        ));
    }

    #[test]
    fn test_extent_and_text_changes_carry_both_sides() {
        let expected = vec![entry(ElementKind::Button, 1, 1, 90.0)];
        let mut changed = entry(ElementKind::Button, 1, 1, 90.0);
        changed.width = 5;
        changed.text = Some("[ OK ]".to_string());
        let diff = ReportMatcher::new().compare_entries(&expected, &[changed]);

        let changes = &diff.modified[0].changes;
        assert!(changes.contains(&EntryChange::ExtentChanged {
            expected: (3, 2),
            actual: (5, 2),
        }));
        assert!(changes.contains(&EntryChange::TextChanged {
            expected: None,
            actual: Some("[ OK ]".to_string()),
        }));
    }

    #[test]
    fn test_position_tolerance() {
        let expected = vec![entry(ElementKind::StopButton, 5, 5, 90.0)];
        let actual = vec![entry(ElementKind::StopButton, 6, 4, 90.0)];

        assert!(!ReportMatcher::new().compare_entries(&expected, &actual).is_match());
        assert!(ReportMatcher::new()
            .with_position_tolerance(1)
            .compare_entries(&expected, &actual)
            .is_match());
    }

    #[test]
    fn test_confidence_tolerance() {
        let expected = vec![entry(ElementKind::ArrowDown, 1, 1, 95.0)];
        let actual = vec![entry(ElementKind::ArrowDown, 1, 1, 93.0)];

        // Ignored by default
        assert!(ReportMatcher::new().compare_entries(&expected, &actual).is_match());

        let diff = ReportMatcher::new()
            .with_confidence_tolerance(1.0)
            .compare_entries(&expected, &actual);
        assert_eq!(
            diff.modified[0].changes,
            vec![EntryChange::ConfidenceChanged {
                expected: 95.0,
                actual: 93.0
            }]
        );

        assert!(ReportMatcher::new()
            .with_confidence_tolerance(2.5)
            .compare_entries(&expected, &actual)
            .is_match());
    }
}
