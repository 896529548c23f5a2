//! Writes replacement symbols into a copy of the grid.
//!
//! Single-row detections get their replacement truncated or padded to the
//! matched width. Multi-row detections are cleared to blanks and the
//! replacement is centered on the middle row (`row + height / 2`), with
//! `(width - len) / 2` blanks on the left and the rest on the right.

use glyphscan_core::{Grid, RenderSettings, ScanSettings};

use crate::detection::{Detection, DetectionSet};
use crate::report::DetectionReport;

/// Grid annotator.
#[derive(Debug, Clone)]
pub struct Annotator {
    blank: char,
    percent_decimals: u8,
}

impl Annotator {
    /// Create an annotator with default settings.
    pub fn new() -> Self {
        Self::from_settings(&ScanSettings::default(), &RenderSettings::default())
    }

    /// Create an annotator from scan and render settings.
    pub fn from_settings(scan: &ScanSettings, render: &RenderSettings) -> Self {
        Self {
            blank: scan.blank_glyph,
            percent_decimals: render.percent_decimals,
        }
    }

    /// Produce the annotated grid and the ordered report.
    ///
    /// The input grid is not modified. Row count is preserved, and a row
    /// never grows past its original length through padding alone.
    pub fn annotate(&self, grid: &Grid, set: &DetectionSet) -> (Grid, DetectionReport) {
        let original_lengths: Vec<usize> = (0..grid.height()).map(|r| grid.row_len(r)).collect();
        let mut rows: Vec<Vec<char>> = grid.rows().map(<[char]>::to_vec).collect();

        for detection in set {
            self.apply(&mut rows, detection);
        }

        for (row, original) in rows.iter_mut().zip(original_lengths) {
            while row.len() > original && row.last().is_some_and(|&c| c == self.blank || c == ' ') {
                row.pop();
            }
        }

        let report = DetectionReport::from_set(set, self.percent_decimals);
        (Grid::new(rows), report)
    }

    fn apply(&self, rows: &mut [Vec<char>], detection: &Detection) {
        let bounds = &detection.bounds;
        let width = bounds.width;

        if bounds.height == 1 {
            let cells = fit(&detection.replacement, width, ' ');
            splice(rows, bounds.row, bounds.col, &cells, self.blank);
            return;
        }

        let center = bounds.row + bounds.height / 2;
        let cleared = vec![self.blank; width];
        for row in bounds.row..bounds.bottom() {
            if row == center {
                let cells = center_pad(&detection.replacement, width, self.blank);
                splice(rows, row, bounds.col, &cells, self.blank);
            } else {
                splice(rows, row, bounds.col, &cleared, self.blank);
            }
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate or right-pad `text` to exactly `width` cells.
pub fn fit(text: &str, width: usize, pad: char) -> Vec<char> {
    let mut cells: Vec<char> = text.chars().take(width).collect();
    cells.resize(width, pad);
    cells
}

/// Center `text` in exactly `width` cells, extra padding on the right.
///
/// Text longer than `width` is truncated.
pub fn center_pad(text: &str, width: usize, pad: char) -> Vec<char> {
    let chars: Vec<char> = text.chars().take(width).collect();
    let left = (width - chars.len()) / 2;
    let mut cells = vec![pad; left];
    cells.extend(chars);
    cells.resize(width, pad);
    cells
}

/// Overwrite `cells` into `rows[row]` starting at `col`, extending the row
/// with `blank` when it is too short. Rows past the end are ignored.
fn splice(rows: &mut [Vec<char>], row: usize, col: usize, cells: &[char], blank: char) {
    let Some(target) = rows.get_mut(row) else {
        return;
    };
    let end = col + cells.len();
    if target.len() < end {
        target.resize(end, blank);
    }
    target[col..end].copy_from_slice(cells);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphscan_core::{Bounds, ElementKind};

    fn detection(kind: ElementKind, bounds: Bounds, replacement: &str) -> Detection {
        Detection {
            kind,
            bounds,
            confidence: 0.95,
            text: None,
            replacement: replacement.to_string(),
        }
    }

    fn annotate(rows: &[&str], detections: Vec<Detection>) -> Vec<String> {
        let grid = Grid::from_rows(rows.iter().copied());
        let set = DetectionSet::from_accepted(detections);
        let (annotated, _) = Annotator::new().annotate(&grid, &set);
        (0..annotated.height()).map(|r| annotated.row_text(r)).collect()
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5, ' '), vec!['a', 'b', 'c', ' ', ' ']);
        assert_eq!(fit("abcdef", 3, ' '), vec!['a', 'b', 'c']);
        assert!(fit("abc", 0, ' ').is_empty());
    }

    #[test]
    fn test_center_pad_floor_left() {
        assert_eq!(center_pad("⬇", 5, ' ').into_iter().collect::<String>(), "  ⬇  ");
        assert_eq!(center_pad("⬇", 4, ' ').into_iter().collect::<String>(), " ⬇  ");
        assert_eq!(center_pad("ab", 5, '.').into_iter().collect::<String>(), ".ab..");
        assert_eq!(center_pad("toolong", 3, ' ').into_iter().collect::<String>(), "too");
    }

    #[test]
    fn test_multi_row_centered() {
        let rows = annotate(
            &["  #  ", " ### ", "#####"],
            vec![detection(ElementKind::ArrowDown, Bounds::new(0, 0, 5, 3), "⬇")],
        );
        assert_eq!(rows, vec!["     ", "  ⬇  ", "     "]);
    }

    #[test]
    fn test_even_height_center_row() {
        let rows = annotate(
            &["x█ y", "x██y", "x██y", "x█ y"],
            vec![detection(ElementKind::ArrowRight, Bounds::new(0, 1, 2, 4), "➡")],
        );
        // row + 4 / 2 = row 2
        assert_eq!(rows, vec!["x  y", "x  y", "x➡ y", "x  y"]);
    }

    #[test]
    fn test_single_row_truncate_and_pad() {
        let rows = annotate(
            &["ab[x]cd", "--###---!"],
            vec![
                detection(ElementKind::Checkbox, Bounds::new(0, 2, 3, 1), "☑"),
                detection(ElementKind::ProgressBar, Bounds::new(1, 2, 6, 1), "[█████_____] 50%"),
            ],
        );
        assert_eq!(rows, vec!["ab☑  cd", "--[█████!"]);
    }

    #[test]
    fn test_padding_does_not_grow_short_rows() {
        // Window padded past the end of the short first row
        let rows = annotate(
            &[" █", "███"],
            vec![detection(ElementKind::ArrowDown, Bounds::new(0, 0, 3, 2), "⬇")],
        );
        assert_eq!(rows, vec!["  ", " ⬇ "]);
    }

    #[test]
    fn test_input_grid_untouched() {
        let grid = Grid::from_rows(["[x]"]);
        let set = DetectionSet::from_accepted(vec![detection(
            ElementKind::Checkbox,
            Bounds::new(0, 0, 3, 1),
            "☑",
        )]);
        let (annotated, report) = Annotator::new().annotate(&grid, &set);
        assert_eq!(grid.row_text(0), "[x]");
        // Padded to the three matched cells
        assert_eq!(annotated.row_text(0), "☑  ");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_no_detections_is_identity() {
        let grid = Grid::from_rows(["abc", "", "de"]);
        let (annotated, report) = Annotator::new().annotate(&grid, &DetectionSet::default());
        assert_eq!(annotated, grid);
        assert!(report.is_empty());
    }
}
