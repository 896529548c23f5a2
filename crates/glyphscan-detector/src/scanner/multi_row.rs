//! Sliding-window scanner for multi-row templates.

use std::sync::Arc;

use glyphscan_core::{Bounds, Grid, ScanSettings};

use crate::detection::{Detection, ScanStats, Scanner};
use crate::library::{Template, TemplateLibrary};
use crate::region::extract;
use crate::scanner::context::{ContextScorer, NoContext};
use crate::similarity::score_at_least;

/// Slides every template over every window position and keeps windows whose
/// confidence clears the threshold.
///
/// Windows start at every row where the template fits vertically, and at
/// every column where it fits within the longest row the window spans;
/// shorter rows are padded with the blank glyph. Work is bounded by
/// `max_work` cell comparisons per pass: a template whose windows would push
/// the total past the budget is not scanned, nor is any template after it.
pub struct MultiRowScanner {
    threshold: f64,
    blank: char,
    max_work: u64,
    context: Arc<dyn ContextScorer>,
}

impl MultiRowScanner {
    /// Create a scanner with default settings and no context bonus.
    pub fn new() -> Self {
        Self::from_settings(&ScanSettings::default())
    }

    /// Create a scanner from scan settings.
    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self {
            threshold: settings.threshold,
            blank: settings.blank_glyph,
            max_work: settings.max_work,
            context: Arc::new(NoContext),
        }
    }

    /// Use a context scorer.
    pub fn with_context(mut self, context: Arc<dyn ContextScorer>) -> Self {
        self.context = context;
        self
    }

    /// Acceptance threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Window origins for a template, row-major.
    fn origins(&self, grid: &Grid, template: &Template) -> Vec<(usize, usize)> {
        let (height, width) = (template.height(), template.width());
        if height > grid.height() {
            return Vec::new();
        }

        let mut origins = Vec::new();
        for row in 0..=grid.height() - height {
            let span = (row..row + height)
                .map(|r| grid.row_len(r))
                .max()
                .unwrap_or(0);
            if span < width {
                continue;
            }
            origins.extend((0..=span - width).map(|col| (row, col)));
        }
        origins
    }

    fn scan_template(
        &self,
        grid: &Grid,
        template: &Template,
        origins: &[(usize, usize)],
        stats: &mut ScanStats,
        out: &mut Vec<Detection>,
    ) {
        let weight = template.weight();
        let max_multiplier = self.context.max_multiplier().max(1.0);
        let minimum = self.threshold / (weight * max_multiplier);
        if minimum > 1.0 {
            stats.windows_pruned += origins.len() as u64;
            return;
        }

        for &(row, col) in origins {
            let region = extract(grid, row, col, template.height(), template.width(), self.blank);
            let Some(similarity) = score_at_least(&region, template, minimum) else {
                stats.windows_pruned += 1;
                continue;
            };
            stats.windows_scored += 1;

            let bounds = Bounds::new(row, col, template.width(), template.height());
            let multiplier = self.context.multiplier(grid, &bounds).clamp(1.0, max_multiplier);
            let confidence = (similarity * weight * multiplier).min(1.0);

            if confidence >= self.threshold {
                out.push(Detection {
                    kind: template.kind(),
                    bounds,
                    confidence,
                    text: None,
                    replacement: template.kind().symbol().to_string(),
                });
            }
        }
    }
}

impl Default for MultiRowScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for MultiRowScanner {
    fn name(&self) -> &'static str {
        "multi_row"
    }

    fn scan(&self, grid: &Grid, library: &TemplateLibrary, stats: &mut ScanStats) -> Vec<Detection> {
        let mut results = Vec::new();
        if grid.is_empty() {
            return results;
        }

        for template in library.templates() {
            let origins = self.origins(grid, template);
            if origins.is_empty() {
                continue;
            }

            let work = origins.len() as u64 * template.area() as u64;
            if stats.work.saturating_add(work) > self.max_work {
                tracing::warn!(
                    "Scan budget of {} cell comparisons exhausted at template {}; skipping the rest",
                    self.max_work,
                    template.name()
                );
                stats.budget_exhausted = true;
                break;
            }
            stats.work += work;

            self.scan_template(grid, template, &origins, stats, &mut results);
        }

        tracing::debug!(
            "{} scanner ({} context): {} candidates, {} windows scored, {} pruned",
            self.name(),
            self.context.name(),
            results.len(),
            stats.windows_scored,
            stats.windows_pruned
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::context::KeywordContext;
    use glyphscan_core::ElementKind;

    fn down_library() -> TemplateLibrary {
        TemplateLibrary::builder()
            .template(ElementKind::ArrowDown, &["  #  ", " ### ", "#####"], 0.95)
            .build()
    }

    #[test]
    fn test_exact_match() {
        let grid = Grid::from_rows(["  #  ", " ### ", "#####"]);
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&grid, &down_library(), &mut stats);

        assert_eq!(detected.len(), 1);
        let d = &detected[0];
        assert_eq!(d.kind, ElementKind::ArrowDown);
        assert_eq!(d.bounds, Bounds::new(0, 0, 5, 3));
        assert!((d.confidence - 0.95).abs() < 1e-12);
        assert_eq!(d.replacement, "⬇");
        assert_eq!(stats.work, 15);
    }

    #[test]
    fn test_match_offset_inside_larger_grid() {
        let grid = Grid::from_rows([
            "..........",
            "....  #  .",
            ".... ### .",
            "....#####.",
        ]);
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&grid, &down_library(), &mut stats);

        assert!(detected
            .iter()
            .any(|d| d.bounds.row == 1 && d.bounds.col == 4 && (d.confidence - 0.95).abs() < 1e-12));
        for d in &detected {
            assert!(d.confidence >= 0.7 && d.confidence <= 1.0);
        }
    }

    #[test]
    fn test_below_threshold_dropped() {
        let grid = Grid::from_rows(["abcde", "fghij", "klmno"]);
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&grid, &down_library(), &mut stats);
        assert!(detected.is_empty());
        assert_eq!(stats.windows_pruned, 1);
    }

    #[test]
    fn test_template_taller_than_grid_skipped() {
        let grid = Grid::from_rows(["#####"]);
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&grid, &down_library(), &mut stats);
        assert!(detected.is_empty());
        assert_eq!(stats.work, 0);
    }

    #[test]
    fn test_short_rows_are_padded() {
        // Trailing blanks trimmed by the renderer; still a match.
        let grid = Grid::from_rows(["  #", " ###", "#####"]);
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&grid, &down_library(), &mut stats);
        assert_eq!(detected.len(), 1);
        assert!((detected[0].confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_empty_grid() {
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::new().scan(&Grid::default(), &down_library(), &mut stats);
        assert!(detected.is_empty());
        let detected =
            MultiRowScanner::new().scan(&Grid::from_rows(["", "", ""]), &down_library(), &mut stats);
        assert!(detected.is_empty());
    }

    #[test]
    fn test_work_budget() {
        let grid = Grid::from_rows(["  #  ", " ### ", "#####"]);
        let settings = ScanSettings {
            max_work: 10,
            ..ScanSettings::default()
        };
        let mut stats = ScanStats::default();
        let detected = MultiRowScanner::from_settings(&settings).scan(&grid, &down_library(), &mut stats);
        assert!(detected.is_empty());
        assert!(stats.budget_exhausted);
        assert_eq!(stats.work, 0);
    }

    #[test]
    fn test_context_bonus_is_capped_at_one() {
        let grid = Grid::from_rows(["download", "  #  ", " ### ", "#####"]);
        let scanner = MultiRowScanner::new().with_context(Arc::new(KeywordContext::new()));
        let mut stats = ScanStats::default();
        let detected = scanner.scan(&grid, &down_library(), &mut stats);

        let arrow = detected
            .iter()
            .find(|d| d.bounds.row == 1 && d.bounds.col == 0)
            .unwrap();
        // 0.95 * 1.2 capped
        assert_eq!(arrow.confidence, 1.0);
    }

    #[test]
    fn test_context_bonus_lifts_weak_match() {
        // 14/15 * 0.7 = 0.653 alone, 0.784 with the keyword bonus
        let library = TemplateLibrary::builder()
            .template(ElementKind::ArrowDown, &["  #  ", " ### ", "#####"], 0.7)
            .build();
        let grid = Grid::from_rows(["pause", "# #  ", " ### ", "#####"]);

        let mut stats = ScanStats::default();
        let plain = MultiRowScanner::new().scan(&grid, &library, &mut stats);
        assert!(plain.iter().all(|d| d.bounds.row != 1));

        let mut stats = ScanStats::default();
        let boosted = MultiRowScanner::new()
            .with_context(Arc::new(KeywordContext::new()))
            .scan(&grid, &library, &mut stats);
        let arrow = boosted.iter().find(|d| d.bounds.row == 1).unwrap();
        assert!(arrow.confidence >= 0.7 && arrow.confidence <= 1.0);
    }
}
