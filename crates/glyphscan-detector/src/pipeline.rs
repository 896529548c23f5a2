//! Detection pipeline: scanners, resolver, annotator.

use std::sync::Arc;

use glyphscan_core::{DetectorConfig, Grid};
use serde::Serialize;

use crate::annotator::Annotator;
use crate::detection::{DetectionSet, ScanStats, Scanner};
use crate::library::TemplateLibrary;
use crate::report::DetectionReport;
use crate::resolver::resolve;
use crate::scanner::{ContextScorer, KeywordContext, MultiRowScanner, NoContext, SingleRowScanner};

/// Result of a full pass over one grid.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Annotated copy of the input
    pub grid: Grid,
    /// Accepted detections ordered by (row, col)
    pub report: DetectionReport,
    /// Counters for the pass
    pub stats: ScanStats,
}

/// Runs every enabled scanner over a grid, resolves conflicts between their
/// candidates, and annotates the result.
///
/// Holds no state between passes; one detector can serve any number of
/// grids, from any number of threads.
pub struct Detector {
    library: Arc<TemplateLibrary>,
    scanners: Vec<Arc<dyn Scanner>>,
    annotator: Annotator,
}

impl Detector {
    /// Detector over the built-in library with default settings.
    pub fn new() -> Self {
        Self::with_library(TemplateLibrary::builtin(), &DetectorConfig::default())
    }

    /// Detector configured from a [`DetectorConfig`].
    ///
    /// Extra templates and patterns in the config are added to the built-in
    /// table; without any, the shared built-in library is used as is.
    pub fn from_config(config: &DetectorConfig) -> Self {
        let library = if config.templates.is_empty() && config.patterns.is_empty() {
            TemplateLibrary::builtin()
        } else {
            Arc::new(TemplateLibrary::from_config(config))
        };
        Self::with_library(library, config)
    }

    /// Detector over a custom library.
    pub fn with_library(library: Arc<TemplateLibrary>, config: &DetectorConfig) -> Self {
        let context: Arc<dyn ContextScorer> = if config.scan.context_bonus {
            Arc::new(KeywordContext::new())
        } else {
            Arc::new(NoContext)
        };

        let mut detector = Self {
            library,
            scanners: Vec::new(),
            annotator: Annotator::from_settings(&config.scan, &config.render),
        };
        detector.add_scanner(Arc::new(
            MultiRowScanner::from_settings(&config.scan).with_context(context),
        ));
        detector.add_scanner(Arc::new(SingleRowScanner::with_render(config.render.clone())));
        detector
    }

    /// Add a scanner. Its candidates compete with everyone else's in the
    /// resolver.
    pub fn add_scanner(&mut self, scanner: Arc<dyn Scanner>) {
        self.scanners.push(scanner);
    }

    /// Template library in use.
    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Names of the registered scanners, in run order.
    pub fn scanner_names(&self) -> Vec<&'static str> {
        self.scanners.iter().map(|s| s.name()).collect()
    }

    /// Scan and resolve, without annotating.
    pub fn detect(&self, grid: &Grid) -> (DetectionSet, ScanStats) {
        let mut stats = ScanStats {
            templates_loaded: self.library.template_count(),
            templates_rejected: self.library.templates_rejected(),
            rules_rejected: self.library.rules_rejected(),
            ..ScanStats::default()
        };

        let mut candidates = Vec::new();
        for scanner in &self.scanners {
            if !scanner.enabled() {
                continue;
            }
            candidates.extend(scanner.scan(grid, &self.library, &mut stats));
        }
        stats.raw_candidates = candidates.len();

        let set = resolve(candidates, &mut stats);
        tracing::debug!(
            "Detection pass: {} candidates, {} accepted, {} conflicts dropped",
            stats.raw_candidates,
            stats.accepted,
            stats.conflicts_dropped
        );

        (set, stats)
    }

    /// Scan, resolve and annotate.
    pub fn analyze(&self, grid: &Grid) -> Analysis {
        let (set, stats) = self.detect(grid);
        let (annotated, report) = self.annotator.annotate(grid, &set);
        Analysis {
            grid: annotated,
            report,
            stats,
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}
