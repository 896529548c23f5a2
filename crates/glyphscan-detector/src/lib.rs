//! # glyphscan-detector
//!
//! UI element detection engine for glyph grids.
//!
//! This crate provides:
//! - Template library (multi-row templates and single-line rules per kind)
//! - Region extraction with blank padding
//! - Density-tolerant similarity scoring
//! - Multi-row and single-row scanners, with an optional context bonus
//! - Greedy conflict resolution over cell occupancy
//! - Grid annotation and an ordered detection report
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on glyphscan-core for
//! the grid, geometry and configuration types.
//!
//! ```
//! use glyphscan_core::{ElementKind, Grid};
//! use glyphscan_detector::Detector;
//!
//! let grid = Grid::from_rows(["  █  ", " ███ ", "█████"]);
//! let analysis = Detector::new().analyze(&grid);
//!
//! assert_eq!(analysis.report.entries[0].kind, ElementKind::ArrowDown);
//! assert_eq!(analysis.grid.row_text(1), "  ⬇  ");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotator;
pub mod detection;
pub mod formatter;
pub mod library;
pub mod pipeline;
pub mod region;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod similarity;
pub mod testing;

// Re-export commonly used types
pub use annotator::Annotator;
pub use detection::{Detection, DetectionSet, ScanStats, Scanner};
pub use formatter::Formatter;
pub use library::{SingleLineRule, Template, TemplateLibrary, TemplateLibraryBuilder};
pub use pipeline::{Analysis, Detector};
pub use region::{extract, Region};
pub use report::{DetectionReport, ReportEntry};
pub use resolver::resolve;
pub use scanner::{ContextScorer, KeywordContext, MultiRowScanner, NoContext, SingleRowScanner};
pub use similarity::score;
