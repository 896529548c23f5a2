//! Per-row pattern scanner for single-line rules.

use glyphscan_core::{Bounds, Grid, RenderSettings};

use crate::detection::{Detection, ScanStats, Scanner};
use crate::library::{SingleLineRule, TemplateLibrary};

/// Applies every single-line rule to every row.
///
/// Matches within one row and rule never overlap; matches from different
/// rules may, and are left to the resolver. A match whose formatter fails is
/// dropped and counted, and the scan carries on.
pub struct SingleRowScanner {
    render: RenderSettings,
}

impl SingleRowScanner {
    /// Create a scanner with default render settings.
    pub fn new() -> Self {
        Self::with_render(RenderSettings::default())
    }

    /// Create a scanner with custom render settings.
    pub fn with_render(render: RenderSettings) -> Self {
        Self { render }
    }

    fn scan_row(
        &self,
        row: usize,
        text: &str,
        rule: &SingleLineRule,
        stats: &mut ScanStats,
        out: &mut Vec<Detection>,
    ) {
        for m in rule.regex().find_iter(text) {
            if m.as_str().is_empty() {
                continue;
            }

            let replacement = match rule.format(m.as_str(), &self.render) {
                Ok(replacement) => replacement,
                Err(e) => {
                    tracing::trace!("Dropping {} match at row {}: {}", rule.name(), row, e);
                    stats.formatter_failures += 1;
                    continue;
                }
            };

            let col = text[..m.start()].chars().count();
            let width = m.as_str().chars().count();
            out.push(Detection {
                kind: rule.kind(),
                bounds: Bounds::new(row, col, width, 1),
                confidence: rule.confidence(),
                text: Some(m.as_str().to_string()),
                replacement,
            });
        }
    }
}

impl Default for SingleRowScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for SingleRowScanner {
    fn name(&self) -> &'static str {
        "single_row"
    }

    fn scan(&self, grid: &Grid, library: &TemplateLibrary, stats: &mut ScanStats) -> Vec<Detection> {
        let mut results = Vec::new();

        for row in 0..grid.height() {
            if grid.row_len(row) == 0 {
                continue;
            }
            let text = grid.row_text(row);
            for rule in library.rules() {
                self.scan_row(row, &text, rule, stats, &mut results);
            }
        }

        tracing::debug!(
            "{} scanner: {} candidates, {} formatter failures",
            self.name(),
            results.len(),
            stats.formatter_failures
        );

        results
    }
}
