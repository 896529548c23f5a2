//! Weighted similarity between a region and a template.
//!
//! Per cell: 1.0 for identical glyphs, 0.8 when both are dark, 0.7 when both
//! are light, otherwise 0. The score is the mean over all cells.

use glyphscan_core::{classify, GlyphClass};

use crate::library::Template;
use crate::region::Region;

/// Credit for identical glyphs.
pub const EXACT_CREDIT: f64 = 1.0;
/// Credit for two different dark glyphs.
pub const DARK_CREDIT: f64 = 0.8;
/// Credit for two different light glyphs.
pub const LIGHT_CREDIT: f64 = 0.7;

const EPSILON: f64 = 1e-9;

/// Score a single cell pair.
pub fn cell_credit(actual: char, expected: char) -> f64 {
    if actual == expected {
        return EXACT_CREDIT;
    }
    match (classify(actual), classify(expected)) {
        (GlyphClass::Dark, GlyphClass::Dark) => DARK_CREDIT,
        (GlyphClass::Light, GlyphClass::Light) => LIGHT_CREDIT,
        _ => 0.0,
    }
}

/// Similarity in [0, 1]. A shape mismatch scores 0.
pub fn score(region: &Region, template: &Template) -> f64 {
    score_at_least(region, template, 0.0).unwrap_or(0.0)
}

/// Similarity, or `None` as soon as the region provably cannot reach
/// `minimum`. Returns `None` on a shape mismatch.
pub fn score_at_least(region: &Region, template: &Template, minimum: f64) -> Option<f64> {
    if region.height() != template.height() || region.width() != template.width() {
        return None;
    }

    let total = template.area() as f64;
    let needed = minimum * total - EPSILON;
    let mut accumulated = 0.0;
    let mut remaining = total;

    for (r_row, t_row) in region.rows().iter().zip(template.rows()) {
        for (&actual, &expected) in r_row.iter().zip(t_row) {
            accumulated += cell_credit(actual, expected);
            remaining -= 1.0;
            if accumulated + remaining * EXACT_CREDIT < needed {
                return None;
            }
        }
    }

    Some(accumulated / total)
}
