//! Testing utilities for glyphscan detection.
//!
//! Provides report comparison for golden-file regression tests.

pub mod report_compare;

pub use report_compare::{DiffStats, EntryChange, EntryDiff, ReportDiff, ReportMatcher};
